use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, CommonError>;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("url: {0:?}")]
    Url(#[from] url::ParseError),
}
