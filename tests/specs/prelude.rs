// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake compositor on a Unix socket in a temp dir.

use std::path::PathBuf;
use std::sync::Arc;

use lull_wire::{encode_raw, read_frame, EventKind, RequestKind};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};

pub fn tree() -> Value {
    json!({
        "id": 1, "type": "root", "nodes": [{
            "id": 2, "type": "output", "name": "eDP-1", "nodes": [{
                "id": 3, "type": "workspace", "name": "1", "nodes": [
                    { "id": 4, "type": "con", "pid": 20, "app_id": "foot", "visible": true, "focused": true },
                    { "id": 5, "type": "con", "pid": 10, "app_id": "firefox", "visible": false },
                ]
            }]
        }]
    })
}

/// Window event on the firefox container.
pub fn window(change: &str) -> (EventKind, Value) {
    (EventKind::Window, json!({ "change": change, "container": { "app_id": "firefox" } }))
}

pub struct FakeSway {
    _dir: TempDir,
    pub socket: PathBuf,
    requests: Arc<Mutex<Vec<RequestKind>>>,
    accepted: Arc<Mutex<u32>>,
    listener: tokio::task::JoinHandle<()>,
}

impl FakeSway {
    /// Serve GET_TREE/GET_WORKSPACES/SUBSCRIBE; `events` follow each SUBSCRIBE ack. The first `hangups`
    /// connections are dropped after their first request.
    pub fn start(events: Vec<(EventKind, Value)>, hangups: u32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("sway-ipc.sock");
        let listener = UnixListener::bind(&socket).unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let accepted = Arc::new(Mutex::new(0));

        let (log, count) = (requests.clone(), accepted.clone());
        let listener = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let index = {
                    let mut n = count.lock();
                    *n += 1;
                    *n
                };
                tokio::spawn(serve(stream, events.clone(), log.clone(), index <= hangups));
            }
        });
        Self { _dir: dir, socket, requests, accepted, listener }
    }

    pub fn requests(&self) -> Vec<RequestKind> {
        self.requests.lock().clone()
    }

    pub fn accepted(&self) -> u32 {
        *self.accepted.lock()
    }
}

impl Drop for FakeSway {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

async fn serve(
    mut stream: UnixStream,
    events: Vec<(EventKind, Value)>,
    log: Arc<Mutex<Vec<RequestKind>>>,
    hang_up: bool,
) {
    while let Ok(frame) = read_frame(&mut stream).await {
        let code = frame.header.code;
        let Some(kind) = RequestKind::from_code(code) else {
            return;
        };
        log.lock().push(kind);
        if hang_up {
            return;
        }
        let reply = match kind {
            RequestKind::GetTree => tree(),
            RequestKind::GetWorkspaces => json!([]),
            RequestKind::Subscribe => json!({ "success": true }),
            _ => json!([{ "success": true }]),
        };
        let mut out = encode_raw(code, reply.to_string().as_bytes());
        if kind == RequestKind::Subscribe {
            for (event, payload) in &events {
                let event_code = event.code().unwrap();
                out.extend(encode_raw(event_code, payload.to_string().as_bytes()));
            }
        }
        if stream.write_all(&out).await.is_err() {
            return;
        }
    }
}
