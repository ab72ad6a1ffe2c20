// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace entries returned by `GET_WORKSPACES`.

use serde::Deserialize;

/// One workspace as listed by `GET_WORKSPACES`.
///
/// Only the fields lull reads are modelled; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub num: i32,
    pub name: String,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub focused: bool,
    #[serde(default)]
    pub output: String,
    /// Layout summary such as `H[foot firefox]`. Absent on empty workspaces.
    #[serde(default)]
    pub representation: Option<String>,
    #[serde(default)]
    pub floating_nodes: Vec<serde_json::Value>,
}

impl Workspace {
    /// True when the workspace holds exactly one tiled window and nothing floats.
    pub fn has_single_tiled_window(&self) -> bool {
        match self.representation.as_deref() {
            Some(repr) => !repr.contains(' ') && self.floating_nodes.is_empty(),
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
