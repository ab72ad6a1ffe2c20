// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event dispatch and periodic tasks.
//!
//! Handlers are looked up by `(event, change)`. A pair with no handler is
//! dropped silently, as is any event of a kind nobody registered for.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use lull_client::{ClientError, EventMessage, Subscription};
use lull_wire::EventKind;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::context::Context;
use crate::error::EngineError;

/// Reacts to one `(event, change)` pair.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, ctx: &Context, message: &EventMessage) -> Result<(), EngineError>;
}

/// A long-running job that lives until `cancel` fires.
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self, ctx: Context, cancel: CancellationToken) -> Result<(), EngineError>;
}

/// Where dispatched events come from.
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once `cancel` fires.
    async fn recv(&mut self, cancel: &CancellationToken) -> Result<Option<EventMessage>, ClientError>;
}

#[async_trait]
impl EventSource for Subscription {
    async fn recv(&mut self, cancel: &CancellationToken) -> Result<Option<EventMessage>, ClientError> {
        Subscription::recv(self, cancel).await
    }
}

/// `(event, change)` → handler.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<(EventKind, String), (String, Arc<dyn EventHandler>)>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(key, (name, _))| (key, name)))
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name` (used in log lines). Replaces any
    /// handler already bound to the pair.
    pub fn register(
        &mut self,
        event: EventKind,
        change: impl Into<String>,
        name: impl Into<String>,
        handler: Arc<dyn EventHandler>,
    ) {
        self.handlers.insert((event, change.into()), (name.into(), handler));
    }

    pub fn lookup(&self, event: EventKind, change: &str) -> Option<(&str, &Arc<dyn EventHandler>)> {
        self.handlers
            .get(&(event, change.to_string()))
            .map(|(name, handler)| (name.as_str(), handler))
    }

    /// Event kinds with at least one handler, in protocol order.
    pub fn events(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = self.handlers.keys().map(|(kind, _)| *kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Run handlers for every event until `cancel` fires.
///
/// Handler failures are logged and do not stop the loop; stream failures
/// that the subscription could not repair end it.
pub async fn run_dispatch(
    source: &mut dyn EventSource,
    registry: &HandlerRegistry,
    ctx: &Context,
    cancel: &CancellationToken,
) -> Result<(), EngineError> {
    while let Some(message) = source.recv(cancel).await? {
        let Some((name, handler)) = registry.lookup(message.event, &message.change) else {
            trace!(event = %message.event, change = %message.change, "no handler");
            continue;
        };
        debug!(event = %message.event, change = %message.change, handler = name, "dispatch");
        if let Err(e) = handler.handle(ctx, &message).await {
            warn!(event = %message.event, change = %message.change, handler = name, error = %e, "handler failed");
        }
    }
    info!("dispatch loop stopped");
    Ok(())
}

/// Spawn every task with its own child of `cancel`.
pub fn run_tasks(tasks: Vec<Arc<dyn PeriodicTask>>, ctx: &Context, cancel: &CancellationToken) -> JoinSet<()> {
    let mut set = JoinSet::new();
    for task in tasks {
        let ctx = ctx.clone();
        let token = cancel.child_token();
        set.spawn(async move {
            info!(task = task.name(), "task started");
            match task.run(ctx, token).await {
                Ok(()) => info!(task = task.name(), "task stopped"),
                Err(e) => warn!(task = task.name(), error = %e, "task failed"),
            }
        });
    }
    set
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
