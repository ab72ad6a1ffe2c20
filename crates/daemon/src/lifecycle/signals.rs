// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process signal handling for `lulld`.

use lull_engine::{refresh_power, Context};
use tokio::signal::unix::{signal, SignalKind};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// SIGINT/SIGTERM cancel `ctx.shutdown`; SIGUSR1 re-reads the power supply.
///
/// Handlers are installed before this returns, so a signal sent right after
/// is not missed.
pub fn watch_signals(ctx: Context) -> std::io::Result<JoinHandle<()>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut usr1 = signal(SignalKind::user_defined1())?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = ctx.shutdown.cancelled() => return,
                _ = interrupt.recv() => break,
                _ = terminate.recv() => break,
                _ = usr1.recv() => {
                    info!("SIGUSR1, refreshing power state");
                    if let Err(e) = refresh_power(&ctx).await {
                        warn!(error = %e, "power refresh failed");
                    }
                }
            }
        }
        info!("shutdown requested");
        ctx.shutdown.cancel();
    }))
}
