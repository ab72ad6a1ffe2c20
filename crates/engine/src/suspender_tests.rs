// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use lull_adapters::{FakeFailure, FakeProcessTable, FakeSignalAdapter};
use lull_core::SuspendSignal::{Cont, Stop};

use super::*;

struct Harness {
    signals: FakeSignalAdapter,
    procs: Arc<FakeProcessTable>,
    suspender: Arc<Suspender>,
}

fn harness(policy: SuspendPolicy) -> Harness {
    let signals = FakeSignalAdapter::new();
    let procs = Arc::new(FakeProcessTable::new());
    // firefox 10 → {11, 12}, 12 → {13}; foot 20 → {21}, 21 → {22}
    procs.add(10, &[11, 12]);
    procs.add(12, &[13]);
    procs.add(20, &[21]);
    procs.add(21, &[22]);
    procs.add(30, &[]);
    let suspender = Arc::new(Suspender::new(Arc::new(signals.clone()), procs.clone(), policy));
    Harness { signals, procs, suspender }
}

fn window(pid: u32, app_id: &str) -> WindowState {
    WindowState { pid: Pid::new(pid), app_id: app_id.to_string(), visible: false }
}

#[test]
fn stop_signals_children_before_parent() {
    let h = harness(SuspendPolicy::default());

    assert_eq!(h.suspender.deliver(&[window(10, "firefox")], Stop), 1);

    assert_eq!(h.signals.sent(Stop), vec![13, 12, 11, 10]);
    assert!(h.suspender.is_stopped(Pid::new(10)));
}

#[test]
fn stop_twice_is_idempotent() {
    let h = harness(SuspendPolicy::default());

    h.suspender.deliver(&[window(10, "firefox")], Stop);
    assert_eq!(h.suspender.deliver(&[window(10, "firefox")], Stop), 0);

    assert_eq!(h.signals.sent(Stop).len(), 4);
    assert_eq!(h.suspender.stopped(), vec![(Pid::new(10), "firefox".to_string())]);
}

#[test]
fn cont_on_unregistered_pid_sends_nothing() {
    let h = harness(SuspendPolicy::default());

    assert_eq!(h.suspender.deliver(&[window(10, "firefox")], Cont), 0);

    assert!(h.signals.calls().is_empty());
}

#[test]
fn cont_unregisters_and_wakes_every_descendant() {
    let h = harness(SuspendPolicy::default());
    h.suspender.deliver(&[window(10, "firefox")], Stop);
    h.signals.clear();

    assert_eq!(h.suspender.deliver(&[window(10, "firefox")], Cont), 1);

    let mut woken = h.signals.sent(Cont);
    woken.sort_unstable();
    assert_eq!(woken, vec![10, 11, 12, 13]);
    assert!(h.suspender.stopped().is_empty());
}

#[test]
fn no_recursion_apps_keep_grandchildren_running() {
    let h = harness(SuspendPolicy::default());

    h.suspender.deliver(&[window(20, "foot")], Stop);

    assert_eq!(h.signals.sent(Stop), vec![21, 20]);
}

#[test]
fn never_signal_apps_are_skipped_entirely() {
    let mut policy = SuspendPolicy::default();
    policy.never_signal.insert("keepassxc".to_string());
    let h = harness(policy);

    assert_eq!(h.suspender.deliver(&[window(10, "keepassxc")], Stop), 0);

    assert!(h.signals.calls().is_empty());
    assert!(h.suspender.stopped().is_empty());
}

#[test]
fn failed_delivery_evicts_the_pid() {
    let h = harness(SuspendPolicy::default());
    h.signals.fail(30, FakeFailure::Gone);

    h.suspender.deliver(&[window(30, "mpv")], Stop);

    assert!(!h.suspender.is_stopped(Pid::new(30)));
    // a later STOP is attempted again instead of being swallowed
    assert_eq!(h.suspender.deliver(&[window(30, "mpv")], Stop), 1);
}

#[test]
fn failed_child_does_not_roll_back_the_root() {
    let h = harness(SuspendPolicy::default());
    h.signals.fail(12, FakeFailure::Denied);

    h.suspender.deliver(&[window(10, "firefox")], Stop);

    assert!(h.suspender.is_stopped(Pid::new(10)));
    assert_eq!(h.signals.sent(Stop), vec![13, 12, 11, 10]);
}

#[test]
fn vanished_root_is_not_registered() {
    let h = harness(SuspendPolicy::default());
    h.procs.remove(30);

    h.suspender.deliver(&[window(30, "mpv")], Stop);

    assert!(h.suspender.stopped().is_empty());
    assert!(h.signals.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn wake_hold_suppresses_stop_until_released() {
    let h = harness(SuspendPolicy::default());
    h.suspender.deliver(&[window(10, "firefox")], Stop);

    let suspender = h.suspender.clone();
    let hold = tokio::spawn(async move {
        suspender.apply(&[window(10, "firefox")], Cont, Some(Duration::from_secs(1))).await
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(h.suspender.is_locked());
    assert_eq!(h.suspender.apply(&[window(10, "firefox")], Stop, None).await, 0);
    assert!(!h.suspender.is_stopped(Pid::new(10)));

    assert_eq!(hold.await.unwrap(), 1);
    assert!(!h.suspender.is_locked());
    assert_eq!(h.suspender.apply(&[window(10, "firefox")], Stop, None).await, 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_hold_still_releases_the_lock() {
    let h = harness(SuspendPolicy::default());

    let suspender = h.suspender.clone();
    let hold = tokio::spawn(async move {
        suspender.apply(&[window(10, "firefox")], Cont, Some(Duration::from_secs(60))).await
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(h.suspender.is_locked());

    hold.abort();
    let _ = hold.await;

    assert!(!h.suspender.is_locked());
}

#[tokio::test]
async fn cont_proceeds_while_locked() {
    let h = harness(SuspendPolicy::default());
    h.suspender.deliver(&[window(10, "firefox"), window(20, "foot")], Stop);

    let suspender = h.suspender.clone();
    let hold = tokio::spawn(async move {
        suspender.apply(&[window(10, "firefox")], Cont, Some(Duration::from_millis(50))).await
    });
    tokio::task::yield_now().await;

    assert_eq!(h.suspender.deliver(&[window(20, "foot")], Cont), 1);
    hold.await.unwrap();
    assert!(h.suspender.stopped().is_empty());
}

#[test]
fn resume_all_wakes_every_root() {
    let h = harness(SuspendPolicy::default());
    h.suspender.deliver(&[window(10, "firefox"), window(20, "foot")], Stop);
    h.signals.clear();

    assert_eq!(h.suspender.resume_all(), 2);

    assert!(h.suspender.stopped().is_empty());
    let mut woken = h.signals.sent(Cont);
    woken.sort_unstable();
    assert_eq!(woken, vec![10, 11, 12, 13, 20, 21]);
}

#[test]
fn duplicate_targets_transition_once() {
    let h = harness(SuspendPolicy::default());

    let n = h.suspender.deliver(&[window(30, "mpv"), window(30, "mpv")], Stop);

    assert_eq!(n, 1);
    assert_eq!(h.signals.sent(Stop), vec![30]);
}
