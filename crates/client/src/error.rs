// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client error taxonomy.

use lull_wire::{ProtocolError, RequestKind};
use thiserror::Error;

/// Errors surfaced by channels, the connection and subscriptions.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No socket path was configured (neither `SWAYSOCK` nor `I3SOCK`).
    #[error("no compositor socket configured (set SWAYSOCK or I3SOCK)")]
    SocketUnavailable,

    /// Transient transport failure: refused, reset, broken pipe, short read.
    #[error("connection fault: {0}")]
    ConnectionFault(#[from] std::io::Error),

    /// Malformed frame or JSON body.
    #[error("protocol decode fault: {0}")]
    ProtocolDecodeFault(ProtocolError),

    /// Consecutive decode faults on a subscription reached the configured limit.
    #[error("gave up after {0} consecutive decode faults")]
    DecodeFaultLimit(u32),

    /// The compositor refused a `SUBSCRIBE`.
    #[error("subscription to {events:?} rejected: {reply}")]
    SubscriptionRejected { events: Vec<String>, reply: serde_json::Value },

    /// Caller asked for an event the protocol does not define.
    #[error("invalid subscription: unknown event {0:?}")]
    InvalidSubscription(String),

    /// A typed request got a reply of the wrong shape.
    #[error("unexpected {kind} reply: {source}")]
    UnexpectedReply {
        kind: RequestKind,
        #[source]
        source: serde_json::Error,
    },

    /// The connection was shut down while the operation was pending.
    #[error("connection closed")]
    Closed,
}

impl ClientError {
    /// Faults that reconnecting can repair.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClientError::ConnectionFault(_) | ClientError::ProtocolDecodeFault(_))
    }
}

impl From<ProtocolError> for ClientError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Io(io) => ClientError::ConnectionFault(io),
            other => ClientError::ProtocolDecodeFault(other),
        }
    }
}
