// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suspension policies: which windows get which signal.
//!
//! Each policy takes a fresh tree snapshot; nothing here caches compositor
//! state between calls.

use std::time::Duration;

use lull_client::{ClientError, Compositor};
use lull_core::{window_states, SuspendSignal, WindowState};
use tracing::debug;

use crate::suspender::Suspender;

/// One [`WindowState`] per client process, visible wins.
pub async fn overview(ipc: &dyn Compositor) -> Result<Vec<WindowState>, ClientError> {
    let tree = ipc.get_tree().await?;
    Ok(window_states(&tree))
}

/// Split into (visible, invisible).
fn partition(states: Vec<WindowState>) -> (Vec<WindowState>, Vec<WindowState>) {
    states.into_iter().partition(|w| w.visible)
}

/// Wake visible windows, stop invisible ones.
pub async fn signal_all(ipc: &dyn Compositor, suspender: &Suspender) -> Result<(), ClientError> {
    let (visible, invisible) = partition(overview(ipc).await?);
    suspender.apply(&visible, SuspendSignal::Cont, None).await;
    suspender.apply(&invisible, SuspendSignal::Stop, None).await;
    Ok(())
}

/// Signal invisible windows only.
///
/// `Cont` with a `hold` wakes them, keeps STOP suppressed for the hold, then
/// stops whatever is invisible at that point.
pub async fn signal_background(
    ipc: &dyn Compositor,
    suspender: &Suspender,
    signal: SuspendSignal,
    hold: Option<Duration>,
) -> Result<(), ClientError> {
    let (_, background) = partition(overview(ipc).await?);
    match hold {
        Some(hold) if signal == SuspendSignal::Cont && !hold.is_zero() => {
            let woken = suspender.apply(&background, SuspendSignal::Cont, Some(hold)).await;
            debug!(woken, ?hold, "background wake elapsed");
            let (_, background) = partition(overview(ipc).await?);
            suspender.apply(&background, SuspendSignal::Stop, None).await;
        }
        _ => {
            suspender.apply(&background, signal, None).await;
        }
    }
    Ok(())
}

/// Stop (`sleep`) or wake invisible windows.
///
/// Waking skips `no_wakeup` apps; `respect_hibernate` skips `hibernate` apps
/// in both directions.
pub async fn signal_invisible(
    ipc: &dyn Compositor,
    suspender: &Suspender,
    sleep: bool,
    respect_hibernate: bool,
) -> Result<usize, ClientError> {
    let policy = suspender.policy();
    let targets: Vec<WindowState> = overview(ipc)
        .await?
        .into_iter()
        .filter(|w| !w.visible)
        .filter(|w| !(respect_hibernate && policy.hibernate.contains(&w.app_id)))
        .filter(|w| sleep || !policy.no_wakeup.contains(&w.app_id))
        .collect();
    Ok(suspender.apply(&targets, SuspendSignal::for_sleep(sleep), None).await)
}

/// Make a lone tiled window on the focused workspace fullscreen.
///
/// Returns whether the command was issued. A `fullscreen_mode` change is
/// ignored, so leaving fullscreen is not immediately undone.
pub async fn fullscreen_enable(ipc: &dyn Compositor, change: &str) -> Result<bool, ClientError> {
    if change == "fullscreen_mode" {
        return Ok(false);
    }
    let workspaces = ipc.get_workspaces().await?;
    if !workspaces.iter().any(|ws| ws.focused && ws.has_single_tiled_window()) {
        return Ok(false);
    }
    ipc.run_command("fullscreen enable").await?;
    Ok(true)
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
