// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event subscription stream.
//!
//! The stream survives connection loss and garbled frames by reconnecting
//! and re-sending `SUBSCRIBE`. Events in flight during a reconnect are lost,
//! and the compositor may replay state (e.g. a `workspace`/`init`) after a
//! resubscribe, so handlers must tolerate duplicates.

use std::sync::Arc;

use lull_core::SubscribeAck;
use lull_wire::{EventKind, RequestKind};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::channel::Channel;
use crate::error::ClientError;

/// `change` reported for payloads that carry none.
pub const DEFAULT_CHANGE: &str = "run";

/// One delivered event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventMessage {
    pub event: EventKind,
    pub change: String,
    pub payload: Value,
}

impl EventMessage {
    pub fn new(event: EventKind, payload: Value) -> Self {
        let change = payload
            .get("change")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CHANGE)
            .to_string();
        Self { event, change, payload }
    }
}

pub struct Subscription {
    channel: Arc<Channel>,
    events: Vec<EventKind>,
    max_decode_faults: Option<u32>,
    decode_faults: u32,
    /// Set when [`Subscription::recv`] closed the channel on cancel.
    cancelled: bool,
}

impl Subscription {
    pub(crate) async fn open(
        channel: Arc<Channel>,
        events: Vec<EventKind>,
        max_decode_faults: Option<u32>,
    ) -> Result<Self, ClientError> {
        let subscription = Self { channel, events, max_decode_faults, decode_faults: 0, cancelled: false };
        subscription.send_subscribe().await?;
        info!(events = ?subscription.names(), "subscribed");
        Ok(subscription)
    }

    pub fn events(&self) -> &[EventKind] {
        &self.events
    }

    fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(|kind| kind.name()).collect()
    }

    async fn send_subscribe(&self) -> Result<(), ClientError> {
        let names = self.names();
        let body = serde_json::json!(names).to_string();
        let reply = self.channel.send_receive(RequestKind::Subscribe, body.as_bytes()).await?;
        let ack: SubscribeAck = serde_json::from_value(reply.clone())
            .map_err(|source| ClientError::UnexpectedReply { kind: RequestKind::Subscribe, source })?;
        if !ack.success {
            return Err(ClientError::SubscriptionRejected {
                events: names.into_iter().map(String::from).collect(),
                reply,
            });
        }
        Ok(())
    }

    /// Wait for the next event, repairing the stream as needed. After a
    /// cancelled [`Subscription::recv`] the stream resubscribes first.
    pub async fn next(&mut self) -> Result<EventMessage, ClientError> {
        if self.cancelled {
            self.send_subscribe().await?;
            self.cancelled = false;
            debug!("subscription resumed");
        }
        loop {
            match self.channel.receive_event().await {
                Ok((EventKind::Error, _)) => {
                    self.decode_faults += 1;
                    if let Some(limit) = self.max_decode_faults {
                        if self.decode_faults >= limit {
                            warn!(faults = self.decode_faults, "too many undecodable events");
                            return Err(ClientError::DecodeFaultLimit(self.decode_faults));
                        }
                    }
                    debug!(faults = self.decode_faults, "undecodable event, resubscribing");
                    self.send_subscribe().await?;
                }
                Ok((event, payload)) => {
                    self.decode_faults = 0;
                    return Ok(EventMessage::new(event, payload));
                }
                Err(ClientError::ConnectionFault(e)) => {
                    let reason = format!("event stream: {e}");
                    self.channel.reconnect(&reason).await?;
                    self.send_subscribe().await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Like [`Subscription::next`], but ends with `Ok(None)` when `cancel`
    /// fires. The subscription channel is closed on the way out; the next
    /// call reopens it and resubscribes.
    pub async fn recv(&mut self, cancel: &CancellationToken) -> Result<Option<EventMessage>, ClientError> {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => None,
            result = self.next() => Some(result),
        };
        match outcome {
            Some(result) => result.map(Some),
            None => {
                self.cancelled = true;
                self.channel.close().await;
                debug!("subscription cancelled");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
