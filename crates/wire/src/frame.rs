// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Frame encoding and header decoding.

use thiserror::Error;

use crate::RequestKind;

/// Magic marker that opens every frame.
pub const MAGIC: [u8; 6] = *b"i3-ipc";

/// Magic + payload length + type code.
pub const HEADER_LEN: usize = MAGIC.len() + 4 + 4;

/// Largest payload accepted from the peer (64 MiB).
pub const MAX_PAYLOAD_LEN: u32 = 64 * 1024 * 1024;

/// Errors from frame encoding and decoding.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("bad magic: expected \"i3-ipc\", got {0:?}")]
    BadMagic([u8; 6]),

    #[error("payload length {declared} does not match {actual} available bytes")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("payload of {0} bytes exceeds the {MAX_PAYLOAD_LEN} byte limit")]
    PayloadTooLarge(u32),

    #[error("frame body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub payload_len: u32,
    /// Request code on replies, event code on subscription events.
    pub code: u32,
}

impl Header {
    pub fn is_event(&self) -> bool {
        self.code & crate::EVENT_FLAG != 0
    }
}

/// Encode a request: `magic || len(body) u32-LE || code u32-LE || body`.
pub fn encode(kind: RequestKind, body: &[u8]) -> Vec<u8> {
    encode_raw(kind.code(), body)
}

/// Encode a frame with an arbitrary type code (used for event frames in tests
/// and fakes).
pub fn encode_raw(code: u32, body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
    buf.extend_from_slice(&code.to_le_bytes());
    buf.extend_from_slice(body);
    buf
}

/// Decode a header. Pure; only the magic is validated.
pub fn decode_header(bytes: &[u8; HEADER_LEN]) -> Result<Header, ProtocolError> {
    let mut magic = [0u8; 6];
    magic.copy_from_slice(&bytes[..6]);
    if magic != MAGIC {
        return Err(ProtocolError::BadMagic(magic));
    }
    let payload_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
    let code = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);
    Ok(Header { payload_len, code })
}

/// Split a complete frame into its header and body.
pub fn decode(bytes: &[u8]) -> Result<(Header, &[u8]), ProtocolError> {
    let Some(head) = bytes.first_chunk::<HEADER_LEN>() else {
        return Err(ProtocolError::LengthMismatch { declared: HEADER_LEN, actual: bytes.len() });
    };
    let header = decode_header(head)?;
    let body = &bytes[HEADER_LEN..];
    if body.len() != header.payload_len as usize {
        return Err(ProtocolError::LengthMismatch {
            declared: header.payload_len as usize,
            actual: body.len(),
        });
    }
    Ok((header, body))
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
