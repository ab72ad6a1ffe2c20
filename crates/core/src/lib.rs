// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lull-core: window tree model and shared types for the lull crates

pub mod macros;

pub mod pid;
pub mod reply;
pub mod signal;
pub mod tree;
pub mod workspace;

pub use pid::Pid;
pub use reply::{CommandOutcome, SubscribeAck};
pub use signal::SuspendSignal;
pub use tree::{window_states, AppNode, ContainerNode, Node, WindowState};
pub use workspace::Workspace;
