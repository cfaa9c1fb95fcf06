use std::path::PathBuf;
use std::time::Duration;

use tracing::level_filters::LevelFilter;
use url::Url;

use crate::error::CommonError;
use crate::error::Result;
use crate::DEFAULT_CATALOG_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    Url(Url),
    File(PathBuf),
}

impl CatalogLocation {
    /// Exactly one of `url` and `path` must be set.
    pub fn try_new(url: Option<&str>, path: Option<PathBuf>) -> Result<Self> {
        match (url, path) {
            (Some(url), None) => Ok(CatalogLocation::Url(Url::parse(url)?)),
            (None, Some(path)) => Ok(CatalogLocation::File(path)),
            (Some(_), Some(_)) => Err(CommonError::BadConfig(
                "catalog: url and path are mutually exclusive".to_string(),
            )),
            (None, None) => Err(CommonError::BadConfig(
                "catalog: either url or path is required".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub location: CatalogLocation,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Output {
    pub pretty: bool,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: Catalog,
    pub output: Output,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            catalog: Catalog {
                location: CatalogLocation::Url(
                    Url::parse(DEFAULT_CATALOG_URL).expect("default catalog url is valid"),
                ),
                request_timeout: None,
            },
            output: Output { pretty: true },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tracing::level_filters::LevelFilter;

    use crate::config::CatalogLocation;
    use crate::config::Config;
    use crate::error::CommonError;

    #[test]
    fn test_catalog_location() {
        assert_eq!(
            CatalogLocation::try_new(None, Some(PathBuf::from("events.json"))).unwrap(),
            CatalogLocation::File(PathBuf::from("events.json"))
        );
        match CatalogLocation::try_new(Some("http://localhost:8080/events.json"), None).unwrap() {
            CatalogLocation::Url(url) => assert_eq!(url.port(), Some(8080)),
            CatalogLocation::File(_) => panic!("expected url location"),
        }

        assert!(matches!(
            CatalogLocation::try_new(Some("http://localhost"), Some(PathBuf::from("e.json"))),
            Err(CommonError::BadConfig(_))
        ));
        assert!(matches!(
            CatalogLocation::try_new(None, None),
            Err(CommonError::BadConfig(_))
        ));
        assert!(matches!(
            CatalogLocation::try_new(Some("not a url"), None),
            Err(CommonError::Url(_))
        ));
    }

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        match cfg.catalog.location {
            CatalogLocation::Url(url) => {
                assert_eq!(url.host_str(), Some("br-fe-assignment.github.io"));
                assert_eq!(url.path(), "/customer-events/events.json");
            }
            CatalogLocation::File(_) => panic!("expected url location"),
        }
        assert!(cfg.catalog.request_timeout.is_none());
        assert!(cfg.output.pretty);
        assert_eq!(cfg.log.level, LevelFilter::INFO);
    }
}
