// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection to the compositor: a pool of request channels plus one
//! dedicated channel for the event subscription.

use std::path::PathBuf;
use std::sync::Arc;

use lull_core::{CommandOutcome, Node, Workspace};
use lull_wire::{EventKind, RequestKind};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::channel::{Channel, ChannelConfig};
use crate::connector::{Connector, UnixConnector};
use crate::error::ClientError;
use crate::pool::ChannelPool;
use crate::subscription::Subscription;

/// Connection-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Number of request channels.
    pub pool_size: usize,
    /// Open every channel up front instead of on first use.
    pub eager: bool,
    pub channel: ChannelConfig,
    /// Consecutive undecodable events tolerated by a subscription before it
    /// gives up. `None` never gives up.
    pub max_decode_faults: Option<u32>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { pool_size: 5, eager: true, channel: ChannelConfig::default(), max_decode_faults: None }
    }
}

impl ConnectionConfig {
    lull_core::setters! {
        set { pool_size: usize, eager: bool, channel: ChannelConfig }
        option { max_decode_faults: u32 }
    }
}

pub struct Connection {
    pool: ChannelPool,
    events: Arc<Channel>,
    shutdown: CancellationToken,
    max_decode_faults: Option<u32>,
}

impl Connection {
    /// Connect to the Unix socket at `socket`.
    ///
    /// `None` (no `SWAYSOCK`/`I3SOCK`) fails fast with
    /// [`ClientError::SocketUnavailable`].
    pub async fn connect(socket: Option<PathBuf>, config: ConnectionConfig) -> Result<Self, ClientError> {
        let path = socket.ok_or(ClientError::SocketUnavailable)?;
        Self::with_connector(Arc::new(UnixConnector::new(path)), config).await
    }

    pub async fn with_connector(
        connector: Arc<dyn Connector>,
        config: ConnectionConfig,
    ) -> Result<Self, ClientError> {
        let shutdown = CancellationToken::new();
        let pool_size = config.pool_size.max(1);
        let channels: Vec<Arc<Channel>> = (0..pool_size)
            .map(|i| {
                Arc::new(Channel::new(
                    format!("request-{i}"),
                    connector.clone(),
                    config.channel.clone(),
                    shutdown.child_token(),
                ))
            })
            .collect();
        let events = Arc::new(Channel::new(
            "events",
            connector.clone(),
            config.channel.clone(),
            shutdown.child_token(),
        ));

        if config.eager {
            for channel in channels.iter().chain(std::iter::once(&events)) {
                channel.connect().await?;
            }
        }
        info!(socket = %connector.describe(), pool_size, eager = config.eager, "connected to compositor");

        Ok(Self {
            pool: ChannelPool::new(channels),
            events,
            shutdown,
            max_decode_faults: config.max_decode_faults,
        })
    }

    /// One request/reply exchange on a pooled channel.
    pub async fn request(&self, kind: RequestKind, body: &[u8]) -> Result<Value, ClientError> {
        if self.shutdown.is_cancelled() {
            return Err(ClientError::Closed);
        }
        let channel = self.pool.checkout().await?;
        debug!(channel = channel.name(), %kind, "request");
        channel.send_receive(kind, body).await
    }

    async fn typed<T: DeserializeOwned>(&self, kind: RequestKind, body: &[u8]) -> Result<T, ClientError> {
        let value = self.request(kind, body).await?;
        serde_json::from_value(value).map_err(|source| ClientError::UnexpectedReply { kind, source })
    }

    /// Run one or more `;`-separated commands. One outcome per command.
    pub async fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, ClientError> {
        self.typed(RequestKind::RunCommand, command.as_bytes()).await
    }

    pub async fn get_workspaces(&self) -> Result<Vec<Workspace>, ClientError> {
        self.typed(RequestKind::GetWorkspaces, b"").await
    }

    pub async fn get_tree(&self) -> Result<Node, ClientError> {
        self.typed(RequestKind::GetTree, b"").await
    }

    pub async fn get_outputs(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetOutputs, b"").await
    }

    pub async fn get_marks(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetMarks, b"").await
    }

    /// Bar ids when `bar_id` is empty, else that bar's config.
    pub async fn get_bar_config(&self, bar_id: &str) -> Result<Value, ClientError> {
        self.request(RequestKind::GetBarConfig, bar_id.as_bytes()).await
    }

    pub async fn get_version(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetVersion, b"").await
    }

    pub async fn get_binding_modes(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetBindingModes, b"").await
    }

    pub async fn get_config(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetConfig, b"").await
    }

    pub async fn send_tick(&self, payload: &str) -> Result<Value, ClientError> {
        self.request(RequestKind::SendTick, payload.as_bytes()).await
    }

    pub async fn sync(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::Sync, b"").await
    }

    pub async fn get_inputs(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetInputs, b"").await
    }

    pub async fn get_seats(&self) -> Result<Value, ClientError> {
        self.request(RequestKind::GetSeats, b"").await
    }

    /// Subscribe to events by protocol name (`"window"`, `"workspace"`, ...).
    ///
    /// Names are validated before anything is sent.
    pub async fn subscribe<S: AsRef<str>>(&self, names: &[S]) -> Result<Subscription, ClientError> {
        let kinds = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                EventKind::from_name(name).ok_or_else(|| ClientError::InvalidSubscription(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.subscribe_kinds(&kinds).await
    }

    pub async fn subscribe_kinds(&self, kinds: &[EventKind]) -> Result<Subscription, ClientError> {
        if let Some(bad) = kinds.iter().find(|kind| !kind.is_subscribable()) {
            return Err(ClientError::InvalidSubscription(bad.name().to_string()));
        }
        if self.shutdown.is_cancelled() {
            return Err(ClientError::Closed);
        }
        Subscription::open(self.events.clone(), kinds.to_vec(), self.max_decode_faults).await
    }

    /// Close every channel. Pending operations return [`ClientError::Closed`].
    pub async fn close(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        self.pool.close();
        for channel in self.pool.channels() {
            channel.close().await;
        }
        self.events.close().await;
        info!("connection closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
