// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::*;
use crate::channel::ChannelConfig;
use crate::fake::ScriptedConnector;

fn pool(size: usize) -> ChannelPool {
    let connector = Arc::new(ScriptedConnector::new(0, |_, stream| async move { drop(stream) }));
    let channels = (0..size)
        .map(|i| {
            Arc::new(Channel::new(
                format!("pool-{i}"),
                connector.clone(),
                ChannelConfig::default(),
                CancellationToken::new(),
            ))
        })
        .collect();
    ChannelPool::new(channels)
}

#[tokio::test]
async fn checkout_hands_out_distinct_channels() {
    let pool = pool(2);

    let a = pool.checkout().await.unwrap();
    let b = pool.checkout().await.unwrap();

    assert_ne!(a.name(), b.name());
    assert_eq!(pool.available(), 0);
}

#[tokio::test]
async fn dropping_the_guard_returns_the_channel() {
    let pool = pool(1);

    let first = pool.checkout().await.unwrap();
    let name = first.name().to_string();
    drop(first);

    assert_eq!(pool.available(), 1);
    assert_eq!(pool.checkout().await.unwrap().name(), name);
}

#[tokio::test(start_paused = true)]
async fn checkout_waits_while_every_channel_is_busy() {
    let pool = Arc::new(pool(1));
    let held = pool.checkout().await.unwrap();

    let waiter = tokio::spawn({
        let pool = pool.clone();
        async move { pool.checkout().await.map(|c| c.name().to_string()) }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    drop(held);
    assert_eq!(waiter.await.unwrap().unwrap(), "pool-0");
}

#[tokio::test]
async fn waiters_are_served_in_arrival_order() {
    let pool = Arc::new(pool(1));
    let held = pool.checkout().await.unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    let mut waiters = Vec::new();
    for i in 0..3 {
        let (pool, order) = (pool.clone(), order.clone());
        waiters.push(tokio::spawn(async move {
            let _guard = pool.checkout().await.unwrap();
            order.lock().push(i);
        }));
        tokio::task::yield_now().await;
    }
    drop(held);
    for waiter in waiters {
        waiter.await.unwrap();
    }

    assert_eq!(*order.lock(), vec![0, 1, 2]);
}

#[tokio::test]
async fn closed_pool_rejects_checkout() {
    let pool = pool(1);
    pool.close();

    assert!(matches!(pool.checkout().await, Err(ClientError::Closed)));
}
