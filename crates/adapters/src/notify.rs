// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for desktop notifications
#[async_trait]
pub trait NotifyAdapter: Send + Sync + 'static {
    /// Show a notification with a summary line and a body
    async fn notify(&self, summary: &str, body: &str) -> Result<(), NotifyError>;
}

/// Desktop notification adapter using notify-rust (freedesktop D-Bus).
#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, summary: &str, body: &str) -> Result<(), NotifyError> {
        let summary = summary.to_string();
        let body = body.to_string();
        // show() blocks on the D-Bus round trip; keep it off the runtime threads.
        let shown = tokio::task::spawn_blocking(move || {
            notify_rust::Notification::new().summary(&summary).body(&body).show().map(|_| summary)
        })
        .await
        .map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        let summary = shown.map_err(|e| NotifyError::SendFailed(e.to_string()))?;
        tracing::debug!(%summary, "desktop notification sent");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded notification
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NotifyCall {
        pub summary: String,
        pub body: String,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        calls: Arc<Mutex<Vec<NotifyCall>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make later calls fail with `SendFailed` (still recorded)
        pub fn set_failing(&self, fail: bool) {
            *self.fail.lock() = fail;
        }

        /// Get all recorded notifications
        pub fn calls(&self) -> Vec<NotifyCall> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, summary: &str, body: &str) -> Result<(), NotifyError> {
            self.calls.lock().push(NotifyCall { summary: summary.to_string(), body: body.to_string() });
            if *self.fail.lock() {
                return Err(NotifyError::SendFailed("notification daemon unavailable".to_string()));
            }
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyAdapter, NotifyCall};

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
