//! Binary crate for the `skycast` terminal weather screen.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Rendering the screen state as text
//! - The interactive watch loop with manual refresh

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
