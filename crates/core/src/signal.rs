// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-control signals used to freeze and thaw applications.

use serde::{Deserialize, Serialize};

/// The two POSIX job-control signals lull delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspendSignal {
    /// SIGSTOP: freeze the process.
    Stop,
    /// SIGCONT: let a frozen process run again.
    Cont,
}

impl SuspendSignal {
    /// Signal for a "should this app sleep" decision.
    pub fn for_sleep(sleep: bool) -> Self {
        if sleep {
            Self::Stop
        } else {
            Self::Cont
        }
    }
}

crate::simple_display! {
    SuspendSignal {
        Stop => "SIGSTOP",
        Cont => "SIGCONT",
    }
}
