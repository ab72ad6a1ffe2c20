// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suspension engine: the single owner of "which apps are stopped".
//!
//! A root pid is in the registry iff the engine believes it is stopped.
//! Transitions are idempotent: STOP on a registered pid and CONT on an
//! unregistered one do nothing.
//!
//! While a wake hold is active (counter > 0) every STOP is dropped, so a
//! burst of visibility changes cannot re-freeze apps that were just woken.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lull_adapters::{descendants, ProcessTable, SignalAdapter};
use lull_core::{Pid, SuspendSignal, WindowState};
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::{debug, trace, warn};

/// App-id based exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SuspendPolicy {
    /// Signal the app and its direct children only (terminal emulators,
    /// whose grandchildren must keep running).
    pub no_recursion: HashSet<String>,
    /// Never signal these apps at all.
    pub never_signal: HashSet<String>,
    /// Do not wake these apps when resuming invisible windows.
    pub no_wakeup: HashSet<String>,
    /// Leave these apps alone during periodic battery pauses.
    pub hibernate: HashSet<String>,
}

impl Default for SuspendPolicy {
    fn default() -> Self {
        Self {
            no_recursion: ["Alacritty", "PopUp", "foot"].into_iter().map(String::from).collect(),
            never_signal: HashSet::new(),
            no_wakeup: HashSet::new(),
            hibernate: HashSet::new(),
        }
    }
}

pub struct Suspender {
    signals: Arc<dyn SignalAdapter>,
    procs: Arc<dyn ProcessTable>,
    policy: SuspendPolicy,
    stopped: Mutex<HashMap<Pid, String>>,
    holds: AtomicUsize,
}

/// Releases one wake hold when dropped, including when the holding future
/// is cancelled mid-sleep.
struct HoldGuard<'a>(&'a AtomicUsize);

impl Drop for HoldGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Suspender {
    pub fn new(signals: Arc<dyn SignalAdapter>, procs: Arc<dyn ProcessTable>, policy: SuspendPolicy) -> Self {
        Self { signals, procs, policy, stopped: Mutex::new(HashMap::new()), holds: AtomicUsize::new(0) }
    }

    pub fn policy(&self) -> &SuspendPolicy {
        &self.policy
    }

    /// Whether a wake hold currently suppresses STOP.
    pub fn is_locked(&self) -> bool {
        self.holds.load(Ordering::SeqCst) > 0
    }

    pub fn is_stopped(&self, pid: Pid) -> bool {
        self.stopped.lock().contains_key(&pid)
    }

    /// Registered roots, ordered by pid.
    pub fn stopped(&self) -> Vec<(Pid, String)> {
        let mut entries: Vec<_> =
            self.stopped.lock().iter().map(|(pid, app)| (*pid, app.clone())).collect();
        entries.sort();
        entries
    }

    /// Signal every target. Returns the number of transitions performed.
    ///
    /// A `Cont` with a non-zero `hold` keeps STOP suppressed until the hold
    /// has elapsed; the call returns after the hold.
    pub async fn apply(&self, targets: &[WindowState], signal: SuspendSignal, hold: Option<Duration>) -> usize {
        match hold {
            Some(hold) if signal == SuspendSignal::Cont && !hold.is_zero() => {
                self.holds.fetch_add(1, Ordering::SeqCst);
                let _guard = HoldGuard(&self.holds);
                let n = self.deliver(targets, signal);
                tokio::time::sleep(hold).await;
                n
            }
            _ => self.deliver(targets, signal),
        }
    }

    /// Synchronous part of [`Suspender::apply`].
    pub fn deliver(&self, targets: &[WindowState], signal: SuspendSignal) -> usize {
        let mut registry = self.stopped.lock();
        if signal == SuspendSignal::Stop && self.is_locked() {
            debug!(targets = targets.len(), "wake hold active, STOP suppressed");
            return 0;
        }
        targets
            .iter()
            .filter(|target| self.transition(&mut registry, target.pid, &target.app_id, signal))
            .count()
    }

    /// CONT every registered root. Used on shutdown so nothing stays frozen.
    pub fn resume_all(&self) -> usize {
        let mut registry = self.stopped.lock();
        let roots: Vec<(Pid, String)> = registry.iter().map(|(pid, app)| (*pid, app.clone())).collect();
        roots
            .into_iter()
            .filter(|(pid, app_id)| self.transition(&mut registry, *pid, app_id, SuspendSignal::Cont))
            .count()
    }

    fn transition(
        &self,
        registry: &mut HashMap<Pid, String>,
        pid: Pid,
        app_id: &str,
        signal: SuspendSignal,
    ) -> bool {
        if self.policy.never_signal.contains(app_id) {
            trace!(%pid, app_id, "excluded from signalling");
            return false;
        }
        match signal {
            SuspendSignal::Stop => {
                if registry.contains_key(&pid) {
                    return false;
                }
                registry.insert(pid, app_id.to_string());
            }
            SuspendSignal::Cont => {
                if registry.remove(&pid).is_none() {
                    return false;
                }
            }
        }

        let recurse = !self.policy.no_recursion.contains(app_id);
        let mut pids = descendants(self.procs.as_ref(), pid, recurse);
        if pids.is_empty() {
            debug!(%pid, app_id, %signal, "process gone before signalling");
            registry.remove(&pid);
            return true;
        }
        // children first, so a parent is not stopped while still spawning
        if signal == SuspendSignal::Stop {
            pids.reverse();
        }
        for target in &pids {
            if let Err(e) = self.signals.send(*target, signal) {
                warn!(%pid, app_id, child = %target, error = %e, "signal delivery failed");
                registry.remove(&e.pid());
            }
        }
        debug!(%pid, app_id, %signal, processes = pids.len(), "signalled");
        true
    }
}

#[cfg(test)]
#[path = "suspender_tests.rs"]
mod tests;
