use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use common::config::Config;
use filter::catalog::from_config;
use filter::EventCatalogSource;
use filter::FilterCommand;
use filter::FilterConsumer;
use filter::FilterDocument;
use tracing::info;

use crate::command::ready_state;
use crate::consumer::StdoutConsumer;
use crate::error::Error;
use crate::error::Result;

#[derive(Parser, Clone)]
pub struct Apply {
    /// JSON file with an array of filter commands
    #[arg(long)]
    pub script: PathBuf,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn load_script(path: &Path) -> Result<Vec<FilterCommand>> {
    let data = tokio::fs::read(path).await?;

    serde_json::from_slice(&data).map_err(|err| {
        Error::BadRequest(format!("invalid script {}: {err}", path.display()))
    })
}

/// Runs the commands against a freshly initialized filter and applies the result.
pub async fn run(
    source: Arc<dyn EventCatalogSource>,
    consumer: Arc<dyn FilterConsumer>,
    script: Vec<FilterCommand>,
) -> Result<FilterDocument> {
    let mut state = ready_state(source, consumer).await?;

    info!("running {} filter commands", script.len());
    for cmd in script {
        state.dispatch(cmd);
    }

    Ok(state.apply_filters().await?)
}

pub async fn start(args: &Apply, cfg: Config) -> Result<()> {
    let script = load_script(&args.script).await?;
    let consumer = Arc::new(StdoutConsumer::new(cfg.output.pretty));
    run(from_config(&cfg.catalog)?, consumer, script).await?;

    Ok(())
}
