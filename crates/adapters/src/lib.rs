// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lull-adapters: operating-system seams (procfs, signals, power supply,
//! desktop notifications), each with a fake for tests.

pub mod notify;
pub mod power;
pub mod procfs;
pub mod signal;

pub use notify::{DesktopNotifyAdapter, NotifyAdapter, NotifyError};
pub use power::{power_status, set_target, PowerAdapter, PowerError, PowerStatus, SysfsPower, DEFAULT_SYSFS_ROOT};
pub use procfs::{descendants, ProcFs, ProcessTable};
pub use signal::{NixSignalAdapter, SignalAdapter, SignalError};

#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use power::FakePowerAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use procfs::FakeProcessTable;
#[cfg(any(test, feature = "test-support"))]
pub use signal::{FakeFailure, FakeSignalAdapter};
