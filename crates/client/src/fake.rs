// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory transports and a fake compositor for tests.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lull_core::{CommandOutcome, Node, Workspace};
use lull_wire::{encode_raw, read_frame, RawFrame};
use parking_lot::Mutex;
use tokio::io::{AsyncWriteExt, DuplexStream};

use crate::compositor::Compositor;
use crate::connector::{BoxedStream, Connector};
use crate::error::ClientError;

type ServeFn = dyn Fn(u32, DuplexStream) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync;

/// A connector that refuses the first `failures` attempts, then hands out
/// in-memory streams whose far end is driven by `server`.
///
/// `server` receives the 1-based index of the successful connection, so a
/// test can script different behavior for the first and later connections.
pub struct ScriptedConnector {
    remaining_failures: AtomicU32,
    remaining_dead: AtomicU32,
    attempts: AtomicU32,
    connections: AtomicU32,
    server: Box<ServeFn>,
}

impl ScriptedConnector {
    pub fn new<F, Fut>(failures: u32, server: F) -> Self
    where
        F: Fn(u32, DuplexStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            remaining_failures: AtomicU32::new(failures),
            remaining_dead: AtomicU32::new(0),
            attempts: AtomicU32::new(0),
            connections: AtomicU32::new(0),
            server: Box::new(move |n, stream| -> Pin<Box<dyn Future<Output = ()> + Send>> {
                Box::pin(server(n, stream))
            }),
        }
    }

    /// Hand out `n` connections whose far end is already closed, so the
    /// first write on each fails with a broken pipe. They count as
    /// successful connections and come before any live ones.
    pub fn dead_connections(self, n: u32) -> Self {
        self.remaining_dead.store(n, Ordering::SeqCst);
        self
    }

    /// Connect attempts so far, failed ones included.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successful connections so far.
    pub fn connections(&self) -> u32 {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self) -> io::Result<BoxedStream> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let refused = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "scripted refusal"));
        }
        let index = self.connections.fetch_add(1, Ordering::SeqCst) + 1;
        let (client, server) = tokio::io::duplex(64 * 1024);
        let dead = self
            .remaining_dead
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if dead {
            drop(server);
        } else {
            tokio::spawn((self.server)(index, server));
        }
        Ok(Box::new(client))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

/// Answer request frames until the peer hangs up.
///
/// `respond` maps each incoming frame to the raw bytes to write back (zero,
/// one or several frames). Returning `None` drops the connection.
pub async fn serve<F>(mut stream: DuplexStream, mut respond: F)
where
    F: FnMut(RawFrame) -> Option<Vec<Vec<u8>>> + Send,
{
    while let Ok(frame) = read_frame(&mut stream).await {
        let Some(replies) = respond(frame) else {
            return;
        };
        for reply in replies {
            if stream.write_all(&reply).await.is_err() {
                return;
            }
        }
    }
}

/// Encode a JSON value as a frame with the given code.
pub fn frame(code: u32, body: &serde_json::Value) -> Vec<u8> {
    encode_raw(code, body.to_string().as_bytes())
}

/// Compositor double over a fixed tree and workspace list.
#[derive(Default)]
pub struct FakeCompositor {
    tree: Mutex<Option<Node>>,
    workspaces: Mutex<Vec<Workspace>>,
    commands: Mutex<Vec<String>>,
}

impl FakeCompositor {
    pub fn new(tree: Node) -> Self {
        Self { tree: Mutex::new(Some(tree)), ..Self::default() }
    }

    pub fn set_tree(&self, tree: Node) {
        *self.tree.lock() = Some(tree);
    }

    pub fn set_workspaces(&self, workspaces: Vec<Workspace>) {
        *self.workspaces.lock() = workspaces;
    }

    /// Commands received so far, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }
}

#[async_trait]
impl Compositor for FakeCompositor {
    async fn get_tree(&self) -> Result<Node, ClientError> {
        self.tree.lock().clone().ok_or(ClientError::Closed)
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>, ClientError> {
        Ok(self.workspaces.lock().clone())
    }

    async fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, ClientError> {
        self.commands.lock().push(command.to_string());
        Ok(vec![CommandOutcome { success: true, parse_error: false, error: None }])
    }
}
