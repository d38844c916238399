//! chatter - a small text-mode IRC client.

use std::fs::File;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatter::app;
use chatter::config::Args;

/// Debug log written alongside the client; the terminal itself is in
/// raw mode, so diagnostics cannot go to stdout.
const LOG_FILE: &str = "chatter.log";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log = File::create(LOG_FILE)
        .with_context(|| format!("failed to create {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log))
        .with_ansi(false)
        .init();

    let reason = app::run(&args)
        .await
        .context("connection failed")?;
    std::process::exit(reason.code());
}
