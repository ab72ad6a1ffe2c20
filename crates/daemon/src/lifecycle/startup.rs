// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::path::PathBuf;
use std::sync::Arc;

use lull_adapters::{
    DesktopNotifyAdapter, NixSignalAdapter, NotifyAdapter, PowerAdapter, ProcFs, ProcessTable, SignalAdapter,
    SysfsPower, DEFAULT_SYSFS_ROOT,
};
use lull_client::Connection;
use lull_engine::{Context, Suspender};
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{Daemon, LifecycleError};
use crate::config::Config;
use crate::env;

/// OS seams the daemon runs against.
pub struct Adapters {
    pub signals: Arc<dyn SignalAdapter>,
    pub procs: Arc<dyn ProcessTable>,
    pub notifier: Arc<dyn NotifyAdapter>,
    pub power: Arc<dyn PowerAdapter>,
}

impl Adapters {
    pub fn system(config: &Config) -> Self {
        Self {
            signals: Arc::new(NixSignalAdapter),
            procs: Arc::new(ProcFs::default()),
            notifier: Arc::new(DesktopNotifyAdapter::new()),
            power: Arc::new(SysfsPower::new(DEFAULT_SYSFS_ROOT, config.battery_target.clone())),
        }
    }
}

/// Connect to the compositor and subscribe. The socket is `socket`, else
/// the config's `socket`, else SWAYSOCK/I3SOCK.
pub async fn startup(config: &Config, socket: Option<PathBuf>) -> Result<Daemon, LifecycleError> {
    let socket = socket.or_else(|| config.socket.clone()).or_else(env::socket_path);
    let connection = Connection::connect(socket, config.connection()).await?;
    Daemon::new(connection, config, Adapters::system(config)).await
}

impl Daemon {
    /// Wire `connection` and `adapters` together per `config`.
    ///
    /// Handler and task names are resolved before subscribing, so a bad
    /// config fails without touching the compositor's event stream.
    pub async fn new(connection: Connection, config: &Config, adapters: Adapters) -> Result<Self, LifecycleError> {
        let registry = config.registry()?;
        let tasks = config.periodic_tasks()?;
        let connection = Arc::new(connection);
        let subscription = connection.subscribe_kinds(&registry.events()).await?;

        let suspender = Suspender::new(adapters.signals, adapters.procs, config.policy.clone());
        let ctx = Context {
            ipc: connection.clone(),
            suspender: Arc::new(suspender),
            notifier: adapters.notifier,
            power: adapters.power,
            timings: config.timings.clone(),
            shutdown: CancellationToken::new(),
        };
        info!(events = ?subscription.events(), "daemon started");
        Ok(Self { connection, subscription, registry, tasks, ctx })
    }
}
