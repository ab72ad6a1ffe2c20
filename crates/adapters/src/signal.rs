// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal delivery.

use lull_core::{Pid, SuspendSignal};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use thiserror::Error;

/// Errors from delivering a signal to one process
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("process {0} is gone")]
    ProcessGone(Pid),

    #[error("not permitted to signal process {0}")]
    PermissionDenied(Pid),

    #[error("signalling process {pid} failed: {errno}")]
    Other { pid: Pid, errno: Errno },
}

impl SignalError {
    pub fn pid(&self) -> Pid {
        match self {
            SignalError::ProcessGone(pid) | SignalError::PermissionDenied(pid) => *pid,
            SignalError::Other { pid, .. } => *pid,
        }
    }
}

/// Sends suspend/resume signals to processes.
///
/// Called from inside the suspender's critical section, so it must not block
/// on anything but the syscall.
pub trait SignalAdapter: Send + Sync {
    fn send(&self, pid: Pid, signal: SuspendSignal) -> Result<(), SignalError>;
}

/// Delivers real SIGSTOP/SIGCONT via `kill(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NixSignalAdapter;

impl SignalAdapter for NixSignalAdapter {
    fn send(&self, pid: Pid, signal: SuspendSignal) -> Result<(), SignalError> {
        let raw = i32::try_from(pid.as_raw()).map_err(|_| SignalError::ProcessGone(pid))?;
        let sig = match signal {
            SuspendSignal::Stop => Signal::SIGSTOP,
            SuspendSignal::Cont => Signal::SIGCONT,
        };
        kill(nix::unistd::Pid::from_raw(raw), sig).map_err(|errno| match errno {
            Errno::ESRCH => SignalError::ProcessGone(pid),
            Errno::EPERM => SignalError::PermissionDenied(pid),
            errno => SignalError::Other { pid, errno },
        })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use std::collections::HashMap;
    use std::sync::Arc;

    use lull_core::{Pid, SuspendSignal};
    use parking_lot::Mutex;

    use super::{SignalAdapter, SignalError};

    /// How a scripted pid fails.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FakeFailure {
        Gone,
        Denied,
    }

    #[derive(Default)]
    struct FakeSignalState {
        calls: Vec<(Pid, SuspendSignal)>,
        failures: HashMap<Pid, FakeFailure>,
    }

    /// Fake signal adapter that records every delivery
    #[derive(Clone, Default)]
    pub struct FakeSignalAdapter {
        inner: Arc<Mutex<FakeSignalState>>,
    }

    impl FakeSignalAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every future signal to `pid` fail.
        pub fn fail(&self, pid: u32, failure: FakeFailure) {
            self.inner.lock().failures.insert(Pid::new(pid), failure);
        }

        /// Every attempted delivery, failed ones included, in order.
        pub fn calls(&self) -> Vec<(Pid, SuspendSignal)> {
            self.inner.lock().calls.clone()
        }

        /// Pids signalled with `signal`, in delivery order.
        pub fn sent(&self, signal: SuspendSignal) -> Vec<u32> {
            self.inner
                .lock()
                .calls
                .iter()
                .filter(|(_, s)| *s == signal)
                .map(|(pid, _)| pid.as_raw())
                .collect()
        }

        pub fn clear(&self) {
            self.inner.lock().calls.clear();
        }
    }

    impl SignalAdapter for FakeSignalAdapter {
        fn send(&self, pid: Pid, signal: SuspendSignal) -> Result<(), SignalError> {
            let mut state = self.inner.lock();
            state.calls.push((pid, signal));
            match state.failures.get(&pid) {
                Some(FakeFailure::Gone) => Err(SignalError::ProcessGone(pid)),
                Some(FakeFailure::Denied) => Err(SignalError::PermissionDenied(pid)),
                None => Ok(()),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeFailure, FakeSignalAdapter};

#[cfg(test)]
#[path = "signal_tests.rs"]
mod tests;
