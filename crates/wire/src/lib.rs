// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! i3/sway IPC wire protocol.
//!
//! Wire format: `"i3-ipc"` magic + 4-byte payload length (little-endian) +
//! 4-byte type code (little-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod frame;
mod io;
mod kind;

pub use frame::{
    decode, decode_header, encode, encode_raw, Header, ProtocolError, HEADER_LEN, MAGIC,
    MAX_PAYLOAD_LEN,
};
pub use io::{read_frame, write_frame, RawFrame};
pub use kind::{EventKind, RequestKind, EVENT_FLAG};
