// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lull-engine: suspension bookkeeping, visibility policies, and the
//! event-to-handler dispatch loop.

pub mod builtin;
mod context;
mod dispatch;
mod error;
mod policy;
mod suspender;

#[cfg(test)]
mod test_support;

pub use builtin::{handler, refresh_power, task, HANDLERS, TASKS};
pub use context::{Context, Timings};
pub use dispatch::{run_dispatch, run_tasks, EventHandler, EventSource, HandlerRegistry, PeriodicTask};
pub use error::EngineError;
pub use policy::{fullscreen_enable, overview, signal_all, signal_background, signal_invisible};
pub use suspender::{SuspendPolicy, Suspender};
