use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use common::config::Config;
use common::types::EventDefinition;
use filter::catalog::from_config;
use filter::consumer::LogConsumer;
use filter::EventCatalogSource;
use tokio::io::AsyncWriteExt;

use crate::command::ready_state;
use crate::consumer::to_json;
use crate::error::Result;

#[derive(Parser, Clone)]
pub struct Catalog {
    /// Only print events whose type contains this text
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn list_events(
    source: Arc<dyn EventCatalogSource>,
    search: Option<&str>,
) -> Result<Vec<EventDefinition>> {
    let state = ready_state(source, Arc::new(LogConsumer)).await?;

    Ok(state
        .search_events(search.unwrap_or_default())
        .into_iter()
        .cloned()
        .collect())
}

pub async fn start(args: &Catalog, cfg: Config) -> Result<()> {
    let events = list_events(from_config(&cfg.catalog)?, args.search.as_deref()).await?;

    let mut out = to_json(&events, cfg.output.pretty)?;
    out.push('\n');
    let mut stdout = tokio::io::stdout();
    stdout.write_all(out.as_bytes()).await?;
    stdout.flush().await?;

    Ok(())
}
