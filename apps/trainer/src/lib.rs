pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
pub mod session;
pub mod store;

pub use config::TrainerConfig;
pub use error::{Result, TrainerError};
pub use runner::Trainer;
pub use session::{Phase, Review, SessionController, SkipPolicy};
pub use store::{CatalogProvider, MemoryStore, ProgressStore, SqliteStore, StoreError};

use clap::Parser;

/// Entry point for the `vocab-trainer` binary.
pub async fn run() -> anyhow::Result<()> {
    // Load .env before clap reads env-backed flags
    dotenvy::dotenv().ok();
    logging::init();

    let cli = cli::Cli::parse();
    let config = cli.config()?;
    tracing::debug!(?config, "configuration resolved");

    cli::execute(cli.command, &config).await?;
    Ok(())
}
