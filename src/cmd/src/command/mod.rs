use std::sync::Arc;

use filter::EventCatalogSource;
use filter::FilterConsumer;
use filter::FilterState;
use tracing::debug;

use crate::error::Error;
use crate::error::Result;

pub mod apply;
pub mod catalog;

/// Initializes a filter state and waits until its catalog is loaded.
pub async fn ready_state(
    source: Arc<dyn EventCatalogSource>,
    consumer: Arc<dyn FilterConsumer>,
) -> Result<FilterState> {
    let mut state = FilterState::new(source, consumer);
    state.initialize();
    state.wait_for_catalog().await;

    if state.loading_error() {
        return Err(Error::CatalogUnavailable);
    }
    debug!("catalog ready: {} events", state.events().len());

    Ok(state)
}
