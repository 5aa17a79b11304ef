//! Envelope framing and low-level codecs for the wiki streaming protocol.
//!
//! This crate provides the byte-level building blocks of the wiki RPC
//! protocol: the length-prefixed envelope format, unsigned LEB128 varints,
//! and a schema-less field scanner for small protobuf payloads.
//!
//! ## Features
//!
//! - **Incremental Decoding**: frames are extracted from an append-only
//!   buffer; a short buffer means "wait for more bytes", never an error
//! - **Zero-Copy I/O**: uses `Bytes`/`BytesMut` for minimal allocations
//! - **Explicit Degraded Modes**: a payload that claims gzip but fails to
//!   inflate is handed back raw as a tagged variant, not swallowed
//!
//! ## Wire Format
//!
//! ```text
//! +----------------------+----------------------------+
//! | u8 flags             | bit 0 = gzip payload       |
//! +----------------------+----------------------------+
//! | u32 length           | payload bytes (big-endian) |
//! +----------------------+----------------------------+
//! | payload              | variable (0..N)            |
//! +----------------------+----------------------------+
//! ```
//!
//! The request side sends exactly one compressed frame; the response side
//! streams frames of either compression mode until the transport ends.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod field;
pub mod frame;
pub mod varint;

// Re-export main types
pub use error::WireError;
pub use field::{
    decode_first_string_field, decode_string_fields, encode_string_field, WIRE_TYPE_LEN,
};
pub use frame::{Frame, FrameDecoder, FrameFlags, Inflated, HEADER_SIZE, MAX_FRAME_SIZE};
pub use varint::{decode_varint, encode_varint, put_varint, MAX_VARINT32_LEN};
