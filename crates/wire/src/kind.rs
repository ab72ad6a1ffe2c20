// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message type tables.
//!
//! The same 4-byte header field carries a [`RequestKind`] code on requests and
//! replies, and an [`EventKind`] code on subscription events. The wire does not
//! say which; the caller picks the table from context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// High bit set on every event code.
pub const EVENT_FLAG: u32 = 0x8000_0000;

/// Commands a client can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    RunCommand,
    GetWorkspaces,
    Subscribe,
    GetOutputs,
    GetTree,
    GetMarks,
    GetBarConfig,
    GetVersion,
    GetBindingModes,
    GetConfig,
    SendTick,
    Sync,
    GetInputs,
    GetSeats,
}

impl RequestKind {
    pub const ALL: [RequestKind; 14] = [
        RequestKind::RunCommand,
        RequestKind::GetWorkspaces,
        RequestKind::Subscribe,
        RequestKind::GetOutputs,
        RequestKind::GetTree,
        RequestKind::GetMarks,
        RequestKind::GetBarConfig,
        RequestKind::GetVersion,
        RequestKind::GetBindingModes,
        RequestKind::GetConfig,
        RequestKind::SendTick,
        RequestKind::Sync,
        RequestKind::GetInputs,
        RequestKind::GetSeats,
    ];

    pub const fn code(self) -> u32 {
        match self {
            RequestKind::RunCommand => 0,
            RequestKind::GetWorkspaces => 1,
            RequestKind::Subscribe => 2,
            RequestKind::GetOutputs => 3,
            RequestKind::GetTree => 4,
            RequestKind::GetMarks => 5,
            RequestKind::GetBarConfig => 6,
            RequestKind::GetVersion => 7,
            RequestKind::GetBindingModes => 8,
            RequestKind::GetConfig => 9,
            RequestKind::SendTick => 10,
            RequestKind::Sync => 11,
            // 12..=99 are reserved upstream
            RequestKind::GetInputs => 100,
            RequestKind::GetSeats => 101,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RequestKind::RunCommand => "RUN_COMMAND",
            RequestKind::GetWorkspaces => "GET_WORKSPACES",
            RequestKind::Subscribe => "SUBSCRIBE",
            RequestKind::GetOutputs => "GET_OUTPUTS",
            RequestKind::GetTree => "GET_TREE",
            RequestKind::GetMarks => "GET_MARKS",
            RequestKind::GetBarConfig => "GET_BAR_CONFIG",
            RequestKind::GetVersion => "GET_VERSION",
            RequestKind::GetBindingModes => "GET_BINDING_MODES",
            RequestKind::GetConfig => "GET_CONFIG",
            RequestKind::SendTick => "SEND_TICK",
            RequestKind::Sync => "SYNC",
            RequestKind::GetInputs => "GET_INPUTS",
            RequestKind::GetSeats => "GET_SEATS",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Asynchronous notifications pushed on a subscribed socket.
///
/// `Unknown` and `Error` never appear on the wire as such: `Unknown` is what an
/// unrecognized event code decodes to, and `Error` is the local marker for
/// "the frame could not be decoded, nothing to deliver".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Workspace,
    Output,
    Mode,
    Window,
    BarconfigUpdate,
    Binding,
    Shutdown,
    Tick,
    BarStateUpdate,
    Input,
    Unknown,
    Error,
}

impl EventKind {
    /// Every event a client may subscribe to.
    pub const SUBSCRIBABLE: [EventKind; 10] = [
        EventKind::Workspace,
        EventKind::Output,
        EventKind::Mode,
        EventKind::Window,
        EventKind::BarconfigUpdate,
        EventKind::Binding,
        EventKind::Shutdown,
        EventKind::Tick,
        EventKind::BarStateUpdate,
        EventKind::Input,
    ];

    /// Wire code, or `None` for the local sentinels.
    pub const fn code(self) -> Option<u32> {
        let low = match self {
            EventKind::Workspace => 0x00,
            EventKind::Output => 0x01,
            EventKind::Mode => 0x02,
            EventKind::Window => 0x03,
            EventKind::BarconfigUpdate => 0x04,
            EventKind::Binding => 0x05,
            EventKind::Shutdown => 0x06,
            EventKind::Tick => 0x07,
            EventKind::BarStateUpdate => 0x14,
            EventKind::Input => 0x15,
            EventKind::Unknown | EventKind::Error => return None,
        };
        Some(EVENT_FLAG | low)
    }

    /// Decode an event code. Never fails: unrecognized codes are `Unknown`.
    pub fn from_code(code: u32) -> Self {
        Self::SUBSCRIBABLE
            .into_iter()
            .find(|kind| kind.code() == Some(code))
            .unwrap_or(EventKind::Unknown)
    }

    pub const fn name(self) -> &'static str {
        match self {
            EventKind::Workspace => "workspace",
            EventKind::Output => "output",
            EventKind::Mode => "mode",
            EventKind::Window => "window",
            EventKind::BarconfigUpdate => "barconfig_update",
            EventKind::Binding => "binding",
            EventKind::Shutdown => "shutdown",
            EventKind::Tick => "tick",
            EventKind::BarStateUpdate => "bar_state_update",
            EventKind::Input => "input",
            EventKind::Unknown => "unknown",
            EventKind::Error => "error",
        }
    }

    /// Look up a subscribable event by its protocol name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::SUBSCRIBABLE.into_iter().find(|kind| kind.name() == name)
    }

    pub fn is_subscribable(self) -> bool {
        self.code().is_some()
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
