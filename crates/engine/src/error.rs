// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use lull_adapters::{NotifyError, PowerError};
use lull_client::ClientError;
use thiserror::Error;

/// Errors surfaced by handlers, tasks and the dispatch loop
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("compositor error: {0}")]
    Client(#[from] ClientError),

    #[error("power error: {0}")]
    Power(#[from] PowerError),

    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),
}
