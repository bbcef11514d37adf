//! resource-pager CLI
//!
//! Command-line interface for paginated listings

use anyhow::Context;
use clap::Parser;
use resource_pager::cli::{Cli, Runner};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.name();

    Runner::new(cli)
        .run()
        .await
        .with_context(|| format!("{command} failed"))
}
