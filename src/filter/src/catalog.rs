use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use common::config;
use common::config::CatalogLocation;
use common::types::EventDefinition;
use common::types::EventsResponse;
use tracing::debug;
use url::Url;

use crate::error::Result;

/// Where the filter model gets its list of event types from.
#[async_trait]
pub trait EventCatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<EventDefinition>>;
}

pub fn from_config(cfg: &config::Catalog) -> Result<Arc<dyn EventCatalogSource>> {
    Ok(match &cfg.location {
        CatalogLocation::Url(url) => {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = cfg.request_timeout {
                builder = builder.timeout(timeout);
            }
            Arc::new(HttpCatalogSource::new(builder.build()?, url.clone()))
        }
        CatalogLocation::File(path) => Arc::new(FileCatalogSource::new(path.clone())),
    })
}

pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpCatalogSource {
    pub fn new(client: reqwest::Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl EventCatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> Result<Vec<EventDefinition>> {
        debug!("fetching event catalog from {}", self.url);
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?;
        let body: EventsResponse = resp.json().await?;

        Ok(body.events)
    }
}

pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl EventCatalogSource for FileCatalogSource {
    async fn fetch_catalog(&self) -> Result<Vec<EventDefinition>> {
        debug!("reading event catalog from {:?}", self.path);
        let data = tokio::fs::read(&self.path).await?;
        let body: EventsResponse = serde_json::from_slice(&data)?;

        Ok(body.events)
    }
}

pub struct StaticCatalogSource {
    events: Vec<EventDefinition>,
}

impl StaticCatalogSource {
    pub fn new(events: Vec<EventDefinition>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventCatalogSource for StaticCatalogSource {
    async fn fetch_catalog(&self) -> Result<Vec<EventDefinition>> {
        Ok(self.events.clone())
    }
}
