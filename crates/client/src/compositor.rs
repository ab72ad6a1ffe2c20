// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The slice of the compositor that event handlers need.

use async_trait::async_trait;
use lull_core::{CommandOutcome, Node, Workspace};

use crate::connection::Connection;
use crate::error::ClientError;

/// Queries and commands used by suspension policies and handlers.
#[async_trait]
pub trait Compositor: Send + Sync {
    async fn get_tree(&self) -> Result<Node, ClientError>;

    async fn get_workspaces(&self) -> Result<Vec<Workspace>, ClientError>;

    async fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, ClientError>;
}

#[async_trait]
impl Compositor for Connection {
    async fn get_tree(&self) -> Result<Node, ClientError> {
        Connection::get_tree(self).await
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>, ClientError> {
        Connection::get_workspaces(self).await
    }

    async fn run_command(&self, command: &str) -> Result<Vec<CommandOutcome>, ClientError> {
        Connection::run_command(self, command).await
    }
}
