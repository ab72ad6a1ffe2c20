// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon settings file.
//!
//! ```toml
//! pool_size = 5
//! backoff_ms = 1000
//! battery_target = "battery.target"
//! tasks = ["wake_timer", "battery_pause"]
//!
//! [policy]
//! never_signal = ["keepassxc"]
//!
//! [timings]
//! wake_interval = 120
//!
//! [subscriptions.window]
//! focus = "visibility"
//! ```
//!
//! Every key is optional. `subscriptions` and `tasks`, when given, replace
//! the defaults entirely.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lull_client::{ChannelConfig, ConnectionConfig};
use lull_engine::{HandlerRegistry, PeriodicTask, SuspendPolicy, Timings};
use lull_wire::EventKind;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to parse {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("unknown handler {name:?} for {event}/{change}")]
    UnknownHandler { event: String, change: String, name: String },

    #[error("unknown task: {0}")]
    UnknownTask(String),
}

/// `event → change → handler name`
pub type Subscriptions = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Overrides SWAYSOCK/I3SOCK.
    pub socket: Option<PathBuf>,
    pub pool_size: usize,
    pub eager: bool,
    pub backoff_ms: u64,
    pub request_timeout_ms: Option<u64>,
    pub max_decode_faults: Option<u32>,
    /// systemd user unit started on battery and stopped on AC.
    pub battery_target: Option<String>,
    pub policy: SuspendPolicy,
    pub timings: Timings,
    pub subscriptions: Subscriptions,
    pub tasks: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket: None,
            pool_size: 5,
            eager: true,
            backoff_ms: 1000,
            request_timeout_ms: None,
            max_decode_faults: None,
            battery_target: None,
            policy: SuspendPolicy::default(),
            timings: Timings::default(),
            subscriptions: default_subscriptions(),
            tasks: vec!["wake_timer".to_string(), "battery_pause".to_string()],
        }
    }
}

fn default_subscriptions() -> Subscriptions {
    let table: [(&str, &[(&str, &str)]); 4] = [
        (
            "window",
            &[
                ("new", "fullscreen"),
                ("close", "fullscreen"),
                ("focus", "fullscreen"),
                ("move", "fullscreen"),
                ("floating", "fullscreen"),
                ("fullscreen_mode", "signal_all"),
            ],
        ),
        ("workspace", &[("focus", "signal_all"), ("init", "signal_all"), ("move", "signal_all")]),
        ("output", &[("unspecified", "wake_background")]),
        ("binding", &[("run", "kill_binding")]),
    ];
    table
        .into_iter()
        .map(|(event, changes)| {
            let changes = changes.iter().map(|(c, h)| (c.to_string(), h.to_string())).collect();
            (event.to_string(), changes)
        })
        .collect()
}

impl Config {
    /// Load `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn connection(&self) -> ConnectionConfig {
        let mut channel = ChannelConfig::default().backoff(Duration::from_millis(self.backoff_ms));
        if let Some(ms) = self.request_timeout_ms {
            channel = channel.request_timeout(Duration::from_millis(ms));
        }
        let config = ConnectionConfig::default().pool_size(self.pool_size).eager(self.eager).channel(channel);
        match self.max_decode_faults {
            Some(n) => config.max_decode_faults(n),
            None => config,
        }
    }

    /// Resolve every subscription entry against the built-in handlers.
    pub fn registry(&self) -> Result<HandlerRegistry, ConfigError> {
        let mut registry = HandlerRegistry::new();
        for (event, changes) in &self.subscriptions {
            let kind = EventKind::from_name(event)
                .filter(|kind| kind.is_subscribable())
                .ok_or_else(|| ConfigError::UnknownEvent(event.clone()))?;
            for (change, name) in changes {
                let handler = lull_engine::handler(name).ok_or_else(|| ConfigError::UnknownHandler {
                    event: event.clone(),
                    change: change.clone(),
                    name: name.clone(),
                })?;
                registry.register(kind, change.as_str(), name.as_str(), handler);
            }
        }
        Ok(registry)
    }

    pub fn periodic_tasks(&self) -> Result<Vec<Arc<dyn PeriodicTask>>, ConfigError> {
        self.tasks
            .iter()
            .map(|name| lull_engine::task(name).ok_or_else(|| ConfigError::UnknownTask(name.clone())))
            .collect()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
