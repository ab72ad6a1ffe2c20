// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events flow from the socket through the registry to the matching handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use lull_adapters::{FakeNotifyAdapter, FakePowerAdapter, FakeProcessTable, FakeSignalAdapter, PowerStatus};
use lull_client::{Connection, ConnectionConfig, EventMessage};
use lull_core::SuspendSignal;
use lull_engine::{
    run_dispatch, Context, EngineError, EventHandler, HandlerRegistry, SuspendPolicy, Suspender, Timings,
};
use lull_wire::{EventKind, RequestKind};
use parking_lot::Mutex;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::prelude::{window, FakeSway};

#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl EventHandler for Recorder {
    async fn handle(&self, _ctx: &Context, message: &EventMessage) -> Result<(), EngineError> {
        self.seen.lock().push(message.change.clone());
        Ok(())
    }
}

fn context(connection: Arc<Connection>, signals: &FakeSignalAdapter) -> Context {
    let procs = FakeProcessTable::new();
    procs.add(10, &[11]);
    procs.add(20, &[]);
    Context {
        ipc: connection,
        suspender: Arc::new(Suspender::new(Arc::new(signals.clone()), Arc::new(procs), SuspendPolicy::default())),
        notifier: Arc::new(FakeNotifyAdapter::new()),
        power: Arc::new(FakePowerAdapter::new(PowerStatus::OnAc)),
        timings: Timings::default(),
        shutdown: CancellationToken::new(),
    }
}

async fn until(mut done: impl FnMut() -> bool) {
    for _ in 0..400 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}

#[tokio::test]
async fn window_focus_runs_only_its_handler() {
    let sway = FakeSway::start(
        vec![
            window("title"),
            window("focus"),
            (EventKind::Workspace, json!({ "change": "focus" })),
        ],
        0,
    );
    let connection = Arc::new(
        Connection::connect(Some(sway.socket.clone()), ConnectionConfig::default().pool_size(1))
            .await
            .unwrap(),
    );
    let focus = Arc::new(Recorder::default());
    let close = Arc::new(Recorder::default());
    let mut registry = HandlerRegistry::new();
    registry.register(EventKind::Window, "focus", "focus", focus.clone());
    registry.register(EventKind::Window, "close", "close", close.clone());
    let mut subscription = connection.subscribe_kinds(&registry.events()).await.unwrap();
    let ctx = context(connection.clone(), &FakeSignalAdapter::new());
    let cancel = CancellationToken::new();

    let dispatch = {
        let (ctx, cancel) = (ctx.clone(), cancel.clone());
        tokio::spawn(async move { run_dispatch(&mut subscription, &registry, &ctx, &cancel).await })
    };
    until(|| !focus.seen.lock().is_empty()).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();
    dispatch.await.unwrap().unwrap();

    assert_eq!(*focus.seen.lock(), vec!["focus".to_string()]);
    assert!(close.seen.lock().is_empty());
    assert_eq!(sway.requests().iter().filter(|k| **k == RequestKind::Subscribe).count(), 1);
    connection.close().await;
}

#[tokio::test]
async fn built_in_signal_all_stops_the_invisible_window() {
    let sway = FakeSway::start(vec![window("focus")], 0);
    let connection = Arc::new(
        Connection::connect(Some(sway.socket.clone()), ConnectionConfig::default().pool_size(2))
            .await
            .unwrap(),
    );
    let mut registry = HandlerRegistry::new();
    registry.register(EventKind::Window, "focus", "signal_all", lull_engine::handler("signal_all").unwrap());
    let mut subscription = connection.subscribe_kinds(&registry.events()).await.unwrap();
    let signals = FakeSignalAdapter::new();
    let ctx = context(connection.clone(), &signals);
    let cancel = CancellationToken::new();

    let dispatch = {
        let (ctx, cancel) = (ctx.clone(), cancel.clone());
        tokio::spawn(async move { run_dispatch(&mut subscription, &registry, &ctx, &cancel).await })
    };
    until(|| !signals.sent(SuspendSignal::Stop).is_empty()).await;
    cancel.cancel();
    dispatch.await.unwrap().unwrap();

    assert_eq!(signals.sent(SuspendSignal::Stop), vec![11, 10]);
    assert!(signals.sent(SuspendSignal::Cont).is_empty());
    assert_eq!(ctx.suspender.resume_all(), 1);
    connection.close().await;
}
