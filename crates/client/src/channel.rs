// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single physical connection to the compositor.
//!
//! The protocol has no request ids, so a reply can only be matched to its
//! request by order. Every operation therefore runs under the channel's mutex:
//! concurrent callers queue up instead of interleaving frames.
//!
//! Lifetime: Disconnected → Connected → (fault) Disconnected → Connected …
//! Reconnection never gives up; only [`Channel::shutdown`] ends it.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lull_wire::{read_frame, write_frame, EventKind, RawFrame, RequestKind};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::connector::{BoxedStream, Connector};
use crate::error::ClientError;

/// Per-channel tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Fixed delay before each reconnect attempt.
    pub backoff: Duration,
    /// Upper bound on one request/reply exchange. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self { backoff: Duration::from_secs(1), request_timeout: None }
    }
}

impl ChannelConfig {
    lull_core::setters! {
        set { backoff: Duration }
        option { request_timeout: Duration }
    }
}

type Slot = Option<BoxedStream>;

/// One socket connection with send, receive and self-repair.
pub struct Channel {
    name: String,
    connector: Arc<dyn Connector>,
    config: ChannelConfig,
    stream: Mutex<Slot>,
    shutdown: CancellationToken,
    backoffs: AtomicU64,
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("target", &self.connector.describe())
            .finish_non_exhaustive()
    }
}

impl Channel {
    pub fn new(
        name: impl Into<String>,
        connector: Arc<dyn Connector>,
        config: ChannelConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            name: name.into(),
            connector,
            config,
            stream: Mutex::new(None),
            shutdown,
            backoffs: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of backoff sleeps taken so far.
    pub fn backoff_count(&self) -> u64 {
        self.backoffs.load(Ordering::Relaxed)
    }

    /// Open the connection if it is not open yet, retrying until it is.
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.guarded(async {
            let mut slot = self.stream.lock().await;
            self.ensure_connected(&mut slot).await.map(|_| ())
        })
        .await
    }

    /// Write one frame. A transport failure gets one reconnect and one retry.
    pub async fn send(&self, kind: RequestKind, body: &[u8]) -> Result<(), ClientError> {
        self.guarded(async {
            let mut slot = self.stream.lock().await;
            self.send_locked(&mut slot, kind, body).await
        })
        .await
    }

    /// Read one frame and decode it as an event.
    ///
    /// A malformed frame does not propagate: the channel reconnects and
    /// returns `(EventKind::Error, {})`, meaning "nothing to deliver, listen
    /// again". Transport failures propagate as [`ClientError::ConnectionFault`].
    pub async fn receive_event(&self) -> Result<(EventKind, Value), ClientError> {
        self.guarded(async {
            let mut slot = self.stream.lock().await;
            self.receive_event_locked(&mut slot).await
        })
        .await
    }

    /// Drop the current stream (if any), wait out the backoff, and reopen.
    pub async fn reconnect(&self, reason: &str) -> Result<(), ClientError> {
        self.guarded(async {
            let mut slot = self.stream.lock().await;
            self.reconnect_locked(&mut slot, reason).await
        })
        .await
    }

    /// Send a request and wait for its reply, as one exclusive operation.
    ///
    /// Transport and decode faults reconnect and retry the whole exchange,
    /// indefinitely.
    pub async fn send_receive(&self, kind: RequestKind, body: &[u8]) -> Result<Value, ClientError> {
        self.guarded(async {
            let mut slot = self.stream.lock().await;
            loop {
                let result = match self.config.request_timeout {
                    Some(limit) => {
                        match tokio::time::timeout(limit, self.exchange(&mut slot, kind, body)).await {
                            Ok(result) => result,
                            Err(_) => Err(ClientError::ConnectionFault(std::io::Error::new(
                                std::io::ErrorKind::TimedOut,
                                format!("{kind} reply not received within {limit:?}"),
                            ))),
                        }
                    }
                    None => self.exchange(&mut slot, kind, body).await,
                };
                match result {
                    Ok(value) => return Ok(value),
                    Err(e) if e.is_recoverable() => {
                        let reason = format!("{kind} failed: {e}");
                        self.reconnect_locked(&mut slot, &reason).await?;
                    }
                    Err(e) => return Err(e),
                }
            }
        })
        .await
    }

    /// Close the stream. No-op when already closed; the channel stays usable
    /// and reconnects on next use.
    pub async fn close(&self) {
        let mut slot = self.stream.lock().await;
        if let Some(mut stream) = slot.take() {
            if let Err(e) = stream.shutdown().await {
                trace!(channel = %self.name, error = %e, "shutdown on close failed");
            }
            debug!(channel = %self.name, "closed");
        }
    }

    /// Cancel pending operations and close for good.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        self.close().await;
    }

    /// Race an operation against shutdown so a blocked read or a backoff
    /// sleep ends (and releases the stream lock) as soon as shutdown fires.
    async fn guarded<T>(&self, op: impl Future<Output = Result<T, ClientError>>) -> Result<T, ClientError> {
        if self.shutdown.is_cancelled() {
            return Err(ClientError::Closed);
        }
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => Err(ClientError::Closed),
            result = op => result,
        }
    }

    async fn exchange(&self, slot: &mut Slot, kind: RequestKind, body: &[u8]) -> Result<Value, ClientError> {
        self.write_once(slot, kind, body).await?;
        let frame = self.read_reply(slot).await?;
        frame.json().map_err(ClientError::ProtocolDecodeFault)
    }

    async fn ensure_connected<'a>(&self, slot: &'a mut Slot) -> Result<&'a mut BoxedStream, ClientError> {
        if slot.is_none() {
            let stream = match self.connector.connect().await {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(channel = %self.name, socket = %self.connector.describe(), error = %e, "connect failed");
                    self.retry_connect().await
                }
            };
            debug!(channel = %self.name, "connected");
            *slot = Some(stream);
        }
        slot.as_mut().ok_or(ClientError::Closed)
    }

    async fn retry_connect(&self) -> BoxedStream {
        let mut attempt: u64 = 0;
        loop {
            attempt += 1;
            self.backoffs.fetch_add(1, Ordering::Relaxed);
            tokio::time::sleep(self.config.backoff).await;
            match self.connector.connect().await {
                Ok(stream) => {
                    info!(channel = %self.name, attempt, "reconnected");
                    return stream;
                }
                Err(e) => {
                    warn!(channel = %self.name, attempt, error = %e, "reconnect failed, retrying");
                }
            }
        }
    }

    async fn reconnect_locked(&self, slot: &mut Slot, reason: &str) -> Result<(), ClientError> {
        warn!(channel = %self.name, reason, "socket error, reconnecting");
        if let Some(mut stream) = slot.take() {
            if let Err(e) = stream.shutdown().await {
                trace!(channel = %self.name, error = %e, "shutdown before reconnect failed");
            }
        }
        *slot = Some(self.retry_connect().await);
        Ok(())
    }

    async fn write_once(&self, slot: &mut Slot, kind: RequestKind, body: &[u8]) -> Result<(), ClientError> {
        let stream = self.ensure_connected(slot).await?;
        trace!(channel = %self.name, %kind, len = body.len(), "send");
        write_frame(stream, kind, body).await.map_err(ClientError::ConnectionFault)
    }

    async fn send_locked(&self, slot: &mut Slot, kind: RequestKind, body: &[u8]) -> Result<(), ClientError> {
        match self.write_once(slot, kind, body).await {
            Err(ClientError::ConnectionFault(e)) => {
                let reason = format!("send {kind} failed: {e}");
                self.reconnect_locked(slot, &reason).await?;
                self.write_once(slot, kind, body).await
            }
            other => other,
        }
    }

    async fn read_once(&self, slot: &mut Slot) -> Result<RawFrame, ClientError> {
        let stream = self.ensure_connected(slot).await?;
        Ok(read_frame(stream).await?)
    }

    /// Read until a non-event frame arrives. Events can only show up here on
    /// the subscription channel, ahead of a `SUBSCRIBE` acknowledgment.
    async fn read_reply(&self, slot: &mut Slot) -> Result<RawFrame, ClientError> {
        loop {
            let frame = self.read_once(slot).await?;
            if !frame.header.is_event() {
                return Ok(frame);
            }
            trace!(channel = %self.name, code = frame.header.code, "skipping event while awaiting reply");
        }
    }

    async fn receive_event_locked(&self, slot: &mut Slot) -> Result<(EventKind, Value), ClientError> {
        let decoded = match self.read_once(slot).await {
            Ok(frame) => frame
                .json()
                .map(|payload| (EventKind::from_code(frame.header.code), payload))
                .map_err(ClientError::ProtocolDecodeFault),
            Err(e) => Err(e),
        };
        match decoded {
            Ok(event) => Ok(event),
            Err(ClientError::ProtocolDecodeFault(e)) => {
                let reason = format!("undecodable event: {e}");
                self.reconnect_locked(slot, &reason).await?;
                Ok((EventKind::Error, Value::Object(serde_json::Map::new())))
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
