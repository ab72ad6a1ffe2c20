// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lulld`: stop background apps, wake them when they become visible.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use lull_daemon::{env, logging, startup, watch_signals, Config};
use tracing::info;

#[derive(Parser)]
#[command(name = "lulld")]
#[command(about = "Suspend invisible sway/i3 windows and resume them on demand")]
#[command(version)]
struct Cli {
    /// Settings file (default: $LULL_CONFIG, else ~/.config/lull/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compositor socket (default: $SWAYSOCK, else $I3SOCK)
    #[arg(short, long)]
    socket: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_file.as_deref());

    let config = match cli.config.or_else(env::config_path) {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            Config::load(&path)?
        }
        None => Config::default(),
    };

    let daemon = startup(&config, cli.socket).await.context("failed to start")?;
    let signals = watch_signals(daemon.context().clone()).context("failed to install signal handlers")?;
    let result = daemon.run().await;
    signals.abort();
    result.context("daemon failed")
}
