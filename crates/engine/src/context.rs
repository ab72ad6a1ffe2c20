// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared state handed to every handler and periodic task.

use std::sync::Arc;
use std::time::Duration;

use lull_adapters::{NotifyAdapter, PowerAdapter};
use lull_client::Compositor;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::suspender::Suspender;

/// Delays and intervals used by the built-in handlers and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Wait after a window event before waking visible apps.
    #[serde(with = "millis")]
    pub settle: Duration,
    /// Further wait before stopping the invisible ones.
    #[serde(with = "millis")]
    pub grace: Duration,
    /// How long background apps stay awake after a wake-up.
    #[serde(with = "millis")]
    pub wake_hold: Duration,
    /// Period of the `wake_timer` task.
    #[serde(with = "secs")]
    pub wake_interval: Duration,
    /// On battery, how long invisible apps sleep per `battery_pause` cycle.
    #[serde(with = "secs")]
    pub seconds_sleep: Duration,
    /// On battery, how long they are woken in between.
    #[serde(with = "secs")]
    pub seconds_wakeup: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(50),
            grace: Duration::from_millis(100),
            wake_hold: Duration::from_secs(1),
            wake_interval: Duration::from_secs(60),
            seconds_sleep: Duration::from_secs(60),
            seconds_wakeup: Duration::from_secs(5),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Everything a handler may touch. Cheap to clone.
#[derive(Clone)]
pub struct Context {
    pub ipc: Arc<dyn Compositor>,
    pub suspender: Arc<Suspender>,
    pub notifier: Arc<dyn NotifyAdapter>,
    pub power: Arc<dyn PowerAdapter>,
    pub timings: Timings,
    /// Parent of every token spawned by handlers and tasks.
    pub shutdown: CancellationToken,
}
