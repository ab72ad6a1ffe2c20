// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lull-client: sway/i3 IPC connection with pooled request channels,
//! a self-repairing event subscription, and reconnect-with-backoff.

mod channel;
mod compositor;
mod connection;
mod connector;
mod error;
mod pool;
mod subscription;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use channel::{Channel, ChannelConfig};
pub use compositor::Compositor;
pub use connection::{Connection, ConnectionConfig};
pub use connector::{BoxedStream, Connector, IpcStream, UnixConnector};
pub use error::ClientError;
pub use pool::{ChannelPool, PooledChannel};
pub use subscription::{EventMessage, Subscription, DEFAULT_CHANGE};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCompositor;
