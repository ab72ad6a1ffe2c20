// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests and subscriptions survive the compositor hanging up.

use std::time::Duration;

use lull_client::{ChannelConfig, Connection, ConnectionConfig};
use lull_wire::{encode_raw, read_frame, EventKind, RequestKind};
use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::prelude::{window, FakeSway};

fn lazy() -> ConnectionConfig {
    ConnectionConfig::default()
        .pool_size(1)
        .eager(false)
        .channel(ChannelConfig::default().backoff(Duration::from_millis(10)))
}

#[tokio::test]
async fn request_is_retried_on_a_fresh_connection() {
    let sway = FakeSway::start(Vec::new(), 1);
    let connection = Connection::connect(Some(sway.socket.clone()), lazy()).await.unwrap();

    let tree = connection.get_tree().await.unwrap();

    assert_eq!(tree.applications().len(), 2);
    assert_eq!(sway.accepted(), 2);
    assert_eq!(sway.requests(), vec![RequestKind::GetTree, RequestKind::GetTree]);
    connection.close().await;
}

#[tokio::test]
async fn subscription_recovers_from_a_dropped_socket() {
    let sway = FakeSway::start(vec![window("focus")], 1);
    let connection = Connection::connect(Some(sway.socket.clone()), lazy()).await.unwrap();

    let mut subscription = connection.subscribe(&["window"]).await.unwrap();
    let message = subscription.recv(&CancellationToken::new()).await.unwrap().unwrap();

    assert_eq!((message.event, message.change.as_str()), (EventKind::Window, "focus"));
    assert_eq!(sway.requests(), vec![RequestKind::Subscribe, RequestKind::Subscribe]);
    connection.close().await;
}

#[tokio::test]
async fn missing_socket_file_is_retried_until_it_appears() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("late.sock");
    let connection = Connection::connect(Some(socket.clone()), lazy()).await.unwrap();

    let server = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let listener = tokio::net::UnixListener::bind(&socket).unwrap();
        let (mut stream, _) = listener.accept().await.unwrap();
        let frame = read_frame(&mut stream).await.unwrap();
        let reply = json!({ "major": 1, "minor": 9 }).to_string();
        stream.write_all(&encode_raw(frame.header.code, reply.as_bytes())).await.unwrap();
        stream
    });

    let version = connection.get_version().await.unwrap();

    assert_eq!(version["major"], 1);
    let _stream = server.await.unwrap();
    connection.close().await;
}
