// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-size pool of request channels.
//!
//! Checkout waits on a semaphore, which tokio grants in FIFO order; the
//! channel itself goes back into the idle queue when the guard drops.

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::channel::Channel;
use crate::error::ClientError;

pub struct ChannelPool {
    permits: Arc<Semaphore>,
    idle: Arc<Mutex<VecDeque<Arc<Channel>>>>,
    all: Vec<Arc<Channel>>,
}

impl ChannelPool {
    pub fn new(channels: Vec<Arc<Channel>>) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(channels.len())),
            idle: Arc::new(Mutex::new(channels.iter().cloned().collect())),
            all: channels,
        }
    }

    /// Channels not currently checked out.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn channels(&self) -> &[Arc<Channel>] {
        &self.all
    }

    /// Wait for a free channel.
    pub async fn checkout(&self) -> Result<PooledChannel, ClientError> {
        let permit = self.permits.clone().acquire_owned().await.map_err(|_| ClientError::Closed)?;
        let channel = self.idle.lock().pop_front().ok_or(ClientError::Closed)?;
        Ok(PooledChannel { channel: Some(channel), idle: self.idle.clone(), _permit: permit })
    }

    /// Stop handing out channels. Waiters get [`ClientError::Closed`].
    pub fn close(&self) {
        self.permits.close();
    }
}

/// A checked-out channel. Returned to the pool on drop.
pub struct PooledChannel {
    channel: Option<Arc<Channel>>,
    idle: Arc<Mutex<VecDeque<Arc<Channel>>>>,
    // dropped after `drop()` has pushed the channel back
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledChannel {
    type Target = Channel;

    fn deref(&self) -> &Channel {
        // Only `drop` takes the channel out.
        match &self.channel {
            Some(channel) => channel,
            None => unreachable!("pooled channel used after release"),
        }
    }
}

impl Drop for PooledChannel {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.take() {
            self.idle.lock().push_back(channel);
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
