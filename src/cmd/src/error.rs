use std::result;

use common::error::CommonError;
use filter::error::FilterError;
use thiserror::Error;
use tracing::subscriber::SetGlobalDefaultError;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("filter: {0:?}")]
    Filter(#[from] FilterError),
    #[error("common: {0:?}")]
    Common(#[from] CommonError),
    #[error("config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("ParseDuration: {0:?}")]
    ParseDuration(#[from] parse_duration::parse::Error),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("serde: {0:?}")]
    Serde(#[from] serde_json::Error),
    #[error("set global default: {0:?}")]
    SetGlobalDefaultError(SetGlobalDefaultError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("event catalog is unavailable")]
    CatalogUnavailable,
}
