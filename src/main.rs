use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kestrel_uci::UciEngine;

/// Environment variable holding the log filter, e.g. `KESTREL_LOG=debug`.
const LOG_ENV: &str = "KESTREL_LOG";

fn main() -> Result<()> {
    // stdout carries the UCI protocol; logs go to stderr.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "kestrel starting");
    UciEngine::new().run().context("UCI loop failed")
}
