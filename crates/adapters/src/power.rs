// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AC adapter state and the systemd battery target.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Where the kernel lists power supplies.
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStatus {
    /// No `AC*` supply present.
    NotALaptop,
    OnAc,
    OnBattery,
}

lull_core::simple_display! {
    PowerStatus {
        NotALaptop => "not-a-laptop",
        OnAc => "on-ac",
        OnBattery => "on-battery",
    }
}

impl PowerStatus {
    pub fn on_battery(self) -> bool {
        self == PowerStatus::OnBattery
    }
}

/// Errors from reading power state or switching the target
#[derive(Debug, Error)]
pub enum PowerError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected value {value:?} in {}", path.display())]
    UnexpectedValue { path: PathBuf, value: String },

    #[error("failed to run systemctl for {target}: {source}")]
    Spawn {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("systemctl {action} {target} exited with {status}")]
    CommandFailed { action: &'static str, target: String, status: std::process::ExitStatus },
}

/// Read the first `AC*` supply's `online` flag under `sysfs_root`.
pub fn power_status(sysfs_root: &Path) -> Result<PowerStatus, PowerError> {
    let Ok(entries) = std::fs::read_dir(sysfs_root) else {
        return Ok(PowerStatus::NotALaptop);
    };
    let mut adapters: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("AC"))
        .map(|entry| entry.path())
        .collect();
    adapters.sort();
    let Some(adapter) = adapters.into_iter().next() else {
        return Ok(PowerStatus::NotALaptop);
    };

    let path = adapter.join("online");
    let raw = std::fs::read_to_string(&path).map_err(|source| PowerError::Read { path: path.clone(), source })?;
    match raw.lines().next().unwrap_or_default().trim() {
        "0" => Ok(PowerStatus::OnBattery),
        "1" => Ok(PowerStatus::OnAc),
        other => Err(PowerError::UnexpectedValue { path, value: other.to_string() }),
    }
}

/// Start `target` on battery, stop it otherwise (`systemctl --user`).
pub async fn set_target(target: &str, on_battery: bool) -> Result<(), PowerError> {
    let action = if on_battery { "start" } else { "stop" };
    let status = Command::new("systemctl")
        .args(["--user", action, target])
        .stdout(std::process::Stdio::null())
        .status()
        .await
        .map_err(|source| PowerError::Spawn { target: target.to_string(), source })?;
    if !status.success() {
        return Err(PowerError::CommandFailed { action, target: target.to_string(), status });
    }
    tracing::debug!(action, unit = target, "systemd target switched");
    Ok(())
}

/// Power state source and battery-target hook.
#[async_trait]
pub trait PowerAdapter: Send + Sync {
    fn status(&self) -> Result<PowerStatus, PowerError>;

    /// Reflect `on_battery` in the configured systemd target, if any.
    async fn apply_target(&self, on_battery: bool) -> Result<(), PowerError>;
}

/// Reads sysfs and drives `systemctl --user`.
#[derive(Debug, Clone)]
pub struct SysfsPower {
    sysfs_root: PathBuf,
    target: Option<String>,
}

impl SysfsPower {
    pub fn new(sysfs_root: impl Into<PathBuf>, target: Option<String>) -> Self {
        Self { sysfs_root: sysfs_root.into(), target }
    }
}

impl Default for SysfsPower {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT, None)
    }
}

#[async_trait]
impl PowerAdapter for SysfsPower {
    fn status(&self) -> Result<PowerStatus, PowerError> {
        power_status(&self.sysfs_root)
    }

    async fn apply_target(&self, on_battery: bool) -> Result<(), PowerError> {
        match &self.target {
            Some(target) => set_target(target, on_battery).await,
            None => Ok(()),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::{PowerAdapter, PowerError, PowerStatus};

    struct FakePowerState {
        status: PowerStatus,
        targets: Vec<bool>,
    }

    /// Fake power adapter with a settable status
    #[derive(Clone)]
    pub struct FakePowerAdapter {
        inner: Arc<Mutex<FakePowerState>>,
    }

    impl FakePowerAdapter {
        pub fn new(status: PowerStatus) -> Self {
            Self { inner: Arc::new(Mutex::new(FakePowerState { status, targets: Vec::new() })) }
        }

        pub fn set_status(&self, status: PowerStatus) {
            self.inner.lock().status = status;
        }

        /// `on_battery` values passed to `apply_target`, in order.
        pub fn targets(&self) -> Vec<bool> {
            self.inner.lock().targets.clone()
        }
    }

    #[async_trait]
    impl PowerAdapter for FakePowerAdapter {
        fn status(&self) -> Result<PowerStatus, PowerError> {
            Ok(self.inner.lock().status)
        }

        async fn apply_target(&self, on_battery: bool) -> Result<(), PowerError> {
            self.inner.lock().targets.push(on_battery);
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakePowerAdapter;

#[cfg(test)]
#[path = "power_tests.rs"]
mod tests;
