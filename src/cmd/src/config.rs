use std::path::PathBuf;

use common::config::CatalogLocation;
use serde_derive::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Catalog {
    pub url: Option<String>,
    pub path: Option<PathBuf>,
    pub request_timeout: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Output {
    pub pretty: bool,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub catalog: Catalog,
    pub output: Output,
    pub log: Log,
}

impl Config {
    pub fn load(path: PathBuf) -> crate::error::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl TryInto<common::config::Config> for Config {
    type Error = crate::error::Error;

    fn try_into(self) -> Result<common::config::Config, Self::Error> {
        let location =
            CatalogLocation::try_new(self.catalog.url.as_deref(), self.catalog.path)?;

        let request_timeout = match self.catalog.request_timeout {
            Some(v) => Some(parse_duration::parse(v.as_str())?),
            None => None,
        };

        Ok(common::config::Config {
            catalog: common::config::Catalog {
                location,
                request_timeout,
            },
            output: common::config::Output {
                pretty: self.output.pretty,
            },
            log: common::config::Log {
                level: self.log.level.into(),
            },
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
