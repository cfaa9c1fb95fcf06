use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, FilterError>;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("catalog: {0}")]
    Catalog(String),
    #[error("consumer: {0}")]
    Consumer(String),
    #[error("http: {0:?}")]
    Http(#[from] reqwest::Error),
    #[error("serde: {0:?}")]
    Serde(#[from] serde_json::Error),
    #[error("io {0}")]
    Io(#[from] std::io::Error),
}
