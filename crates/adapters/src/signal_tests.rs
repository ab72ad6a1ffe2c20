// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::process::{Command, Stdio};

use super::*;

#[test]
fn stop_and_cont_reach_a_real_child() {
    let mut child = Command::new("sleep").arg("30").stdout(Stdio::null()).spawn().unwrap();
    let pid = Pid::new(child.id());

    NixSignalAdapter.send(pid, SuspendSignal::Stop).unwrap();
    NixSignalAdapter.send(pid, SuspendSignal::Cont).unwrap();

    child.kill().unwrap();
    child.wait().unwrap();
}

#[test]
fn reaped_process_is_gone() {
    let mut child = Command::new("true").spawn().unwrap();
    let pid = Pid::new(child.id());
    child.wait().unwrap();

    let err = NixSignalAdapter.send(pid, SuspendSignal::Cont).unwrap_err();

    assert!(matches!(err, SignalError::ProcessGone(p) if p == pid), "got {err:?}");
}

#[test]
fn pid_outside_the_kernel_range_is_gone() {
    let pid = Pid::new(u32::MAX);
    assert!(matches!(NixSignalAdapter.send(pid, SuspendSignal::Stop), Err(SignalError::ProcessGone(_))));
}

#[test]
fn fake_records_calls_and_scripted_failures() {
    let fake = FakeSignalAdapter::new();
    fake.fail(7, FakeFailure::Denied);

    fake.send(Pid::new(5), SuspendSignal::Stop).unwrap();
    let err = fake.send(Pid::new(7), SuspendSignal::Stop).unwrap_err();

    assert!(matches!(err, SignalError::PermissionDenied(_)));
    assert_eq!(err.pid(), Pid::new(7));
    assert_eq!(fake.sent(SuspendSignal::Stop), vec![5, 7]);
    assert!(fake.sent(SuspendSignal::Cont).is_empty());
}
