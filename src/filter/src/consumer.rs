use async_trait::async_trait;
use tracing::info;

use crate::document::FilterDocument;
use crate::error::Result;

/// Receives the normalized document when filters are applied.
#[async_trait]
pub trait FilterConsumer: Send + Sync {
    async fn consume(&self, doc: &FilterDocument) -> Result<()>;
}

/// Writes the document to the log.
#[derive(Default)]
pub struct LogConsumer;

#[async_trait]
impl FilterConsumer for LogConsumer {
    async fn consume(&self, doc: &FilterDocument) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        info!("customer filter model: {json}");

        Ok(())
    }
}
