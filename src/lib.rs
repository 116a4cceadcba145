pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use domain::error::{AppError, Result};
pub use interfaces::cli::Cli;

/// Entry point for the `aurient` binary
pub async fn run() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    Cli::parse().execute().await
}
