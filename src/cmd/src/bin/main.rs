use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use cmd::command::apply;
use cmd::command::apply::Apply;
use cmd::command::catalog;
use cmd::command::catalog::Catalog;
use cmd::config::Config;
use cmd::error::Error;
use cmd::error::Result;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Subcommand, Clone)]
enum Commands {
    /// Print the event catalog
    Catalog(Catalog),
    /// Run a script of filter commands and print the applied filter
    Apply(Apply),
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

fn load_config(path: Option<&PathBuf>) -> Result<common::config::Config> {
    match path {
        Some(path) => Config::load(path.clone())?.try_into(),
        None => Ok(common::config::Config::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let Some(command) = args.command else {
        return Err(Error::BadRequest("no command specified".to_string()));
    };

    let cfg = match &command {
        Commands::Catalog(args) => load_config(args.config.as_ref())?,
        Commands::Apply(args) => load_config(args.config.as_ref())?,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cfg.log.level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).map_err(Error::SetGlobalDefaultError)?;

    let version = env!("CARGO_PKG_VERSION");
    let hash = option_env!("BUILD_HASH").unwrap_or("dev-build");

    info!("customer-filter v{version}-{hash}");

    match &command {
        Commands::Catalog(args) => catalog::start(args, cfg).await?,
        Commands::Apply(args) => apply::start(args, cfg).await?,
    }

    Ok(())
}
