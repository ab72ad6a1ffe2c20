// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in handlers and periodic tasks, looked up by the names used in the
//! daemon config.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lull_client::EventMessage;
use lull_core::SuspendSignal;
use parking_lot::Mutex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::context::Context;
use crate::dispatch::{EventHandler, PeriodicTask};
use crate::error::EngineError;
use crate::policy::{fullscreen_enable, overview, signal_all, signal_background, signal_invisible};

/// Handler names accepted by [`handler`].
pub const HANDLERS: [&str; 6] =
    ["visibility", "signal_all", "wake_background", "fullscreen", "kill_binding", "fullscreen_notify"];

/// Task names accepted by [`task`].
pub const TASKS: [&str; 2] = ["wake_timer", "battery_pause"];

pub fn handler(name: &str) -> Option<Arc<dyn EventHandler>> {
    let handler: Arc<dyn EventHandler> = match name {
        "visibility" => Arc::new(Visibility::default()),
        "signal_all" => Arc::new(SignalAll),
        "wake_background" => Arc::new(WakeBackground::default()),
        "fullscreen" => Arc::new(Fullscreen),
        "kill_binding" => Arc::new(KillBinding),
        "fullscreen_notify" => Arc::new(FullscreenNotify),
        _ => return None,
    };
    Some(handler)
}

pub fn task(name: &str) -> Option<Arc<dyn PeriodicTask>> {
    let task: Arc<dyn PeriodicTask> = match name {
        "wake_timer" => Arc::new(WakeTimer),
        "battery_pause" => Arc::new(BatteryPause),
        _ => return None,
    };
    Some(task)
}

/// Sleep for `period` unless cancelled first. Returns false on cancel.
async fn pause(period: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(period) => true,
    }
}

/// Wake visible windows after `settle`, then stop the invisible ones after
/// `grace`. A newer event cancels the pending run and starts over.
#[derive(Default)]
pub struct Visibility {
    pending: Mutex<Option<CancellationToken>>,
}

impl Visibility {
    async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), EngineError> {
        if !pause(ctx.timings.settle, &cancel).await {
            return Ok(());
        }
        let (visible, invisible): (Vec<_>, Vec<_>) =
            overview(ctx.ipc.as_ref()).await?.into_iter().partition(|w| w.visible);
        ctx.suspender.apply(&visible, SuspendSignal::Cont, None).await;
        if !pause(ctx.timings.grace, &cancel).await {
            return Ok(());
        }
        ctx.suspender.apply(&invisible, SuspendSignal::Stop, None).await;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Visibility {
    async fn handle(&self, ctx: &Context, _message: &EventMessage) -> Result<(), EngineError> {
        let token = ctx.shutdown.child_token();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = Self::run(ctx, token).await {
                warn!(error = %e, "visibility update failed");
            }
        });
        Ok(())
    }
}

pub struct SignalAll;

#[async_trait]
impl EventHandler for SignalAll {
    async fn handle(&self, ctx: &Context, _message: &EventMessage) -> Result<(), EngineError> {
        signal_all(ctx.ipc.as_ref(), &ctx.suspender).await?;
        Ok(())
    }
}

/// Wake background windows for `wake_hold`, e.g. after an output change.
/// The wake runs in the background; a newer event cancels the pending one.
#[derive(Default)]
pub struct WakeBackground {
    pending: Mutex<Option<CancellationToken>>,
}

impl WakeBackground {
    async fn run(ctx: Context, cancel: CancellationToken) -> Result<(), EngineError> {
        let wake =
            signal_background(ctx.ipc.as_ref(), &ctx.suspender, SuspendSignal::Cont, Some(ctx.timings.wake_hold));
        tokio::select! {
            _ = cancel.cancelled() => debug!("background wake superseded"),
            result = wake => result?,
        }
        Ok(())
    }
}

#[async_trait]
impl EventHandler for WakeBackground {
    async fn handle(&self, ctx: &Context, _message: &EventMessage) -> Result<(), EngineError> {
        let token = ctx.shutdown.child_token();
        if let Some(previous) = self.pending.lock().replace(token.clone()) {
            previous.cancel();
        }
        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = Self::run(ctx, token).await {
                warn!(error = %e, "background wake failed");
            }
        });
        Ok(())
    }
}

/// Fullscreen a lone tiled window; otherwise re-evaluate every window.
pub struct Fullscreen;

#[async_trait]
impl EventHandler for Fullscreen {
    async fn handle(&self, ctx: &Context, message: &EventMessage) -> Result<(), EngineError> {
        if !fullscreen_enable(ctx.ipc.as_ref(), &message.change).await? {
            signal_all(ctx.ipc.as_ref(), &ctx.suspender).await?;
        }
        Ok(())
    }
}

/// Binding commands that need the suspender's attention.
///
/// `kill` wakes background windows so the target can handle the close
/// request. `layout toggle tabbed split` changes which windows are shown
/// without a window event, so every window is re-evaluated.
pub struct KillBinding;

/// Binding command that re-evaluates every window.
const LAYOUT_TOGGLE: &str = "layout toggle tabbed split";

#[async_trait]
impl EventHandler for KillBinding {
    async fn handle(&self, ctx: &Context, message: &EventMessage) -> Result<(), EngineError> {
        match message.payload.pointer("/binding/command").and_then(Value::as_str) {
            Some("kill") => {
                signal_background(ctx.ipc.as_ref(), &ctx.suspender, SuspendSignal::Cont, None).await?;
            }
            Some(LAYOUT_TOGGLE) => {
                signal_all(ctx.ipc.as_ref(), &ctx.suspender).await?;
            }
            _ => {}
        }
        Ok(())
    }
}

pub struct FullscreenNotify;

#[async_trait]
impl EventHandler for FullscreenNotify {
    async fn handle(&self, ctx: &Context, message: &EventMessage) -> Result<(), EngineError> {
        let Some(container) = message.payload.get("container") else {
            return Ok(());
        };
        let app_id = container.get("app_id").and_then(Value::as_str).unwrap_or_default();
        let entered = container.get("fullscreen_mode").and_then(Value::as_u64) == Some(1);
        let body = if entered { "Entered fullscreen mode" } else { "Exited fullscreen mode" };
        ctx.notifier.notify(app_id, body).await?;
        Ok(())
    }
}

/// Every `wake_interval`, wake background windows for `wake_hold`.
pub struct WakeTimer;

#[async_trait]
impl PeriodicTask for WakeTimer {
    fn name(&self) -> &str {
        "wake_timer"
    }

    async fn run(&self, ctx: Context, cancel: CancellationToken) -> Result<(), EngineError> {
        while pause(ctx.timings.wake_interval, &cancel).await {
            let wake = signal_background(
                ctx.ipc.as_ref(),
                &ctx.suspender,
                SuspendSignal::Cont,
                Some(ctx.timings.wake_hold),
            );
            tokio::select! {
                _ = cancel.cancelled() => break,
                result = wake => {
                    if let Err(e) = result {
                        warn!(error = %e, "periodic wake failed");
                    }
                }
            }
        }
        Ok(())
    }
}

/// On battery, alternate invisible windows between `seconds_sleep` stopped
/// and `seconds_wakeup` running. Hibernating apps are left alone.
pub struct BatteryPause;

#[async_trait]
impl PeriodicTask for BatteryPause {
    fn name(&self) -> &str {
        "battery_pause"
    }

    async fn run(&self, ctx: Context, cancel: CancellationToken) -> Result<(), EngineError> {
        let mut sleep = true;
        loop {
            match ctx.power.status() {
                Ok(status) if status.on_battery() => {
                    match signal_invisible(ctx.ipc.as_ref(), &ctx.suspender, sleep, true).await {
                        Ok(n) => debug!(sleep, signalled = n, "battery pause"),
                        Err(e) => warn!(error = %e, "battery pause failed"),
                    }
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "power status unavailable"),
            }
            let period = if sleep { ctx.timings.seconds_sleep } else { ctx.timings.seconds_wakeup };
            if !pause(period, &cancel).await {
                return Ok(());
            }
            sleep = !sleep;
        }
    }
}

/// Re-read the power supply, switch the battery unit, and stop (on battery)
/// or wake (on AC) invisible windows.
pub async fn refresh_power(ctx: &Context) -> Result<(), EngineError> {
    let status = ctx.power.status()?;
    info!(%status, "power status");
    let on_battery = status.on_battery();
    ctx.power.apply_target(on_battery).await?;
    signal_invisible(ctx.ipc.as_ref(), &ctx.suspender, on_battery, false).await?;
    Ok(())
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
