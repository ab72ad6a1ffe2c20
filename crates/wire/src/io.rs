// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Async frame I/O over any byte stream.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::frame::{decode_header, encode, Header, ProtocolError, HEADER_LEN, MAX_PAYLOAD_LEN};
use crate::RequestKind;

/// A frame read off the wire, body still undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub header: Header,
    pub body: Vec<u8>,
}

impl RawFrame {
    /// Decode the body as JSON. An empty body decodes as `null`.
    pub fn json(&self) -> Result<serde_json::Value, ProtocolError> {
        if self.body.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Read exactly one header and exactly `payload_len` body bytes.
///
/// EOF in the middle of a frame surfaces as `ProtocolError::Io`
/// (`UnexpectedEof`), which callers treat as a broken connection.
pub async fn read_frame<R>(reader: &mut R) -> Result<RawFrame, ProtocolError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut head = [0u8; HEADER_LEN];
    reader.read_exact(&mut head).await?;
    let header = decode_header(&head)?;
    if header.payload_len > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::PayloadTooLarge(header.payload_len));
    }
    let mut body = vec![0u8; header.payload_len as usize];
    reader.read_exact(&mut body).await?;
    Ok(RawFrame { header, body })
}

/// Write one request frame and flush it.
pub async fn write_frame<W>(writer: &mut W, kind: RequestKind, body: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    writer.write_all(&encode(kind, body)).await?;
    writer.flush().await
}

#[cfg(test)]
#[path = "io_tests.rs"]
mod tests;
