// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lull daemon library
//!
//! Settings, environment resolution, logging and the lifecycle that `lulld`
//! drives.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod logging;

pub use config::{Config, ConfigError};
pub use lifecycle::{startup, watch_signals, Adapters, Daemon, LifecycleError};
