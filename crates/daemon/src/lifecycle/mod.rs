// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, run, shutdown.

mod signals;
mod startup;

pub use signals::watch_signals;
pub use startup::{startup, Adapters};

use std::sync::Arc;

use lull_client::{ClientError, Connection, Subscription};
use lull_engine::{refresh_power, run_dispatch, run_tasks, Context, EngineError, HandlerRegistry, PeriodicTask};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("compositor error: {0}")]
    Client(#[from] ClientError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A connected, subscribed daemon, ready to [`Daemon::run`].
pub struct Daemon {
    connection: Arc<Connection>,
    subscription: Subscription,
    registry: HandlerRegistry,
    tasks: Vec<Arc<dyn PeriodicTask>>,
    ctx: Context,
}

impl Daemon {
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Dispatch events and run periodic tasks until `ctx.shutdown` fires or
    /// the event stream fails for good. Always ends with [`Daemon::shutdown`].
    pub async fn run(mut self) -> Result<(), LifecycleError> {
        let cancel = self.ctx.shutdown.clone();
        if let Err(e) = refresh_power(&self.ctx).await {
            warn!(error = %e, "initial power refresh failed");
        }

        let mut tasks = run_tasks(self.tasks.clone(), &self.ctx, &cancel);
        info!(handlers = self.registry.len(), tasks = self.tasks.len(), "daemon running");
        let result = run_dispatch(&mut self.subscription, &self.registry, &self.ctx, &cancel).await;

        cancel.cancel();
        while tasks.join_next().await.is_some() {}
        self.shutdown().await;
        result.map_err(LifecycleError::from)
    }

    /// Wake every app still stopped and close the connection.
    pub async fn shutdown(&self) {
        let resumed = self.ctx.suspender.resume_all();
        self.connection.close().await;
        info!(resumed, "daemon stopped");
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
