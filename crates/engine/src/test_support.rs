// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use std::sync::Arc;

use lull_adapters::{FakeNotifyAdapter, FakePowerAdapter, FakeProcessTable, FakeSignalAdapter, PowerStatus};
use lull_client::FakeCompositor;
use lull_core::Node;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::context::{Context, Timings};
use crate::suspender::{SuspendPolicy, Suspender};

/// A workspace with one visible `foot` (20), an invisible `firefox` (10) and
/// an invisible `spotify` (40).
pub fn tree(firefox_visible: bool) -> Node {
    serde_json::from_value(json!({
        "id": 1, "type": "root", "nodes": [{
            "id": 2, "type": "workspace", "name": "1", "nodes": [
                { "id": 3, "type": "con", "pid": 20, "app_id": "foot", "visible": true },
                { "id": 4, "type": "con", "pid": 10, "app_id": "firefox", "visible": firefox_visible },
                { "id": 6, "type": "con", "pid": 40, "app_id": "spotify", "visible": false },
            ]
        }]
    }))
    .unwrap()
}

pub struct Fixture {
    pub ipc: Arc<FakeCompositor>,
    pub signals: FakeSignalAdapter,
    pub notifier: FakeNotifyAdapter,
    pub power: FakePowerAdapter,
    pub ctx: Context,
}

pub fn fixture(policy: SuspendPolicy, status: PowerStatus) -> Fixture {
    let procs = FakeProcessTable::new();
    for pid in [10, 20, 40] {
        procs.add(pid, &[]);
    }
    let signals = FakeSignalAdapter::new();
    let notifier = FakeNotifyAdapter::new();
    let power = FakePowerAdapter::new(status);
    let ipc = Arc::new(FakeCompositor::new(tree(false)));
    let ctx = Context {
        ipc: ipc.clone(),
        suspender: Arc::new(Suspender::new(Arc::new(signals.clone()), Arc::new(procs), policy)),
        notifier: Arc::new(notifier.clone()),
        power: Arc::new(power.clone()),
        timings: Timings::default(),
        shutdown: CancellationToken::new(),
    };
    Fixture { ipc, signals, notifier, power, ctx }
}
