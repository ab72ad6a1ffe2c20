// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport seam: how a channel opens its byte stream.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::UnixStream;

/// A bidirectional byte stream a channel can speak the protocol over.
pub trait IpcStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> IpcStream for T {}

pub type BoxedStream = Box<dyn IpcStream>;

/// Opens fresh streams to the compositor.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> std::io::Result<BoxedStream>;

    /// Human-readable target for log lines.
    fn describe(&self) -> String;
}

/// Connects to a Unix-domain socket at a resolved path.
#[derive(Debug, Clone)]
pub struct UnixConnector {
    path: PathBuf,
}

impl UnixConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Connector for UnixConnector {
    async fn connect(&self) -> std::io::Result<BoxedStream> {
        let stream = UnixStream::connect(&self.path).await?;
        Ok(Box::new(stream))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
