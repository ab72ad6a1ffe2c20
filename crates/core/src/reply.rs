// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Small reply bodies returned by the compositor.

use serde::Deserialize;

/// One entry of a `RUN_COMMAND` reply (one per command in the payload).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default)]
    pub parse_error: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply to `SUBSCRIBE`. A missing `success` field reads as failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SubscribeAck {
    #[serde(default)]
    pub success: bool,
}
