//! Envelope framing for the wiki request/response streams.
//!
//! A frame is a 1-byte flag, a 4-byte big-endian payload length, and the
//! payload itself. Bit 0 of the flag marks a gzip-compressed payload. The
//! request side sends exactly one compressed frame; the response side
//! streams frames of either mode.

use std::io::{Read, Write};

use bitflags::bitflags;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::WireError;

/// Envelope header size: flag byte plus big-endian u32 payload length.
pub const HEADER_SIZE: usize = 5;

/// Sanity bound applied when encoding an outbound frame (16 MiB).
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

bitflags! {
    /// Envelope flag byte
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FrameFlags: u8 {
        /// Payload is gzip-compressed
        const GZIP = 1 << 0;
    }
}

/// One envelope of the request or response stream.
///
/// A frame is "complete" only when the buffered bytes cover the full
/// header plus `length` payload bytes; [`FrameDecoder`] enforces this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Flag byte; unknown bits are preserved as received
    pub flags: FrameFlags,
    /// Payload bytes exactly as they appear on the wire
    pub payload: Bytes,
}

/// Payload of a frame after the compression flag has been applied.
///
/// Decompression failure is an explicit outcome, not an error: the raw
/// payload is handed back for the caller to try as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inflated {
    /// Frame was not compressed
    Plain(Bytes),
    /// Frame was gzip-compressed and inflated cleanly
    Gzip(Bytes),
    /// Frame claimed compression but did not inflate; raw payload returned
    Fallback(Bytes),
}

impl Inflated {
    /// The usable payload bytes regardless of how they were obtained.
    pub fn into_bytes(self) -> Bytes {
        match self {
            Inflated::Plain(bytes) | Inflated::Gzip(bytes) | Inflated::Fallback(bytes) => bytes,
        }
    }
}

impl Frame {
    /// Create an uncompressed frame.
    pub fn plain(payload: Bytes) -> Self {
        Self {
            flags: FrameFlags::empty(),
            payload,
        }
    }

    /// Create a gzip-compressed frame from plaintext bytes.
    pub fn compressed(plaintext: &[u8]) -> Result<Self, WireError> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(plaintext.len() / 2 + 16),
            Compression::default(),
        );
        encoder
            .write_all(plaintext)
            .map_err(|_| WireError::Compress)?;
        let payload = encoder.finish().map_err(|_| WireError::Compress)?;

        Ok(Self {
            flags: FrameFlags::GZIP,
            payload: Bytes::from(payload),
        })
    }

    /// Total size of this frame when encoded.
    pub fn encoded_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode the frame to a contiguous buffer.
    pub fn encode(&self) -> Result<Bytes, WireError> {
        let total_size = self.encoded_size();
        if total_size > MAX_FRAME_SIZE {
            return Err(WireError::Size(total_size));
        }

        let mut buf = BytesMut::with_capacity(total_size);
        buf.put_u8(self.flags.bits());
        buf.put_u32(self.payload.len() as u32);
        buf.put_slice(&self.payload);

        Ok(buf.freeze())
    }

    /// Apply the compression flag to the payload.
    ///
    /// A payload that claims gzip but fails to inflate comes back as
    /// [`Inflated::Fallback`] with the raw bytes untouched.
    pub fn inflate(&self) -> Inflated {
        if !self.flags.contains(FrameFlags::GZIP) {
            return Inflated::Plain(self.payload.clone());
        }

        let mut decoder = GzDecoder::new(self.payload.as_ref());
        let mut plaintext = Vec::with_capacity(self.payload.len().saturating_mul(2));
        match decoder.read_to_end(&mut plaintext) {
            Ok(_) => Inflated::Gzip(Bytes::from(plaintext)),
            Err(err) => {
                warn!("gzip inflate failed ({err}); falling back to raw payload");
                Inflated::Fallback(self.payload.clone())
            }
        }
    }
}

/// Incremental frame decoder for an append-only receive buffer.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    _private: (),
}

impl FrameDecoder {
    /// Create a new frame decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one frame from the front of `buf`, advancing past it.
    ///
    /// Returns `None` until a complete frame is buffered. A short buffer
    /// is the normal streaming case, never an error; leftover bytes at
    /// end-of-stream are simply never drained.
    pub fn decode(&mut self, buf: &mut BytesMut) -> Option<Frame> {
        if buf.len() < HEADER_SIZE {
            return None;
        }

        // Peek at the payload length before committing to the frame
        let length = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
        if buf.len() < HEADER_SIZE + length {
            return None;
        }

        let flags = FrameFlags::from_bits_retain(buf[0]);
        buf.advance(HEADER_SIZE);
        let payload = buf.split_to(length).freeze();

        Some(Frame { flags, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_round_trip_plain() {
        let frame = Frame::plain(Bytes::from_static(b"hello world"));
        let encoded = frame.encode().unwrap();
        assert_eq!(encoded.len(), HEADER_SIZE + 11);
        assert_eq!(encoded[0], 0);
        assert_eq!(&encoded[1..5], &11u32.to_be_bytes());

        let mut decoder = FrameDecoder::new();
        let mut buf = BytesMut::from(encoded.as_ref());
        let decoded = decoder.decode(&mut buf).unwrap();
        assert_eq!(decoded, frame);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_frame_round_trip_compressed() {
        let plaintext = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let frame = Frame::compressed(&plaintext).unwrap();
        assert!(frame.flags.contains(FrameFlags::GZIP));

        let encoded = frame.encode().unwrap();
        let mut decoder = FrameDecoder::new();
        let mut buf = BytesMut::from(encoded.as_ref());
        let decoded = decoder.decode(&mut buf).unwrap();
        assert_eq!(decoded.flags, frame.flags);

        match decoded.inflate() {
            Inflated::Gzip(bytes) => assert_eq!(bytes.as_ref(), plaintext.as_slice()),
            other => panic!("expected inflated payload, got {other:?}"),
        }
    }

    #[test]
    fn test_inflate_fallback_on_bad_gzip() {
        let frame = Frame {
            flags: FrameFlags::GZIP,
            payload: Bytes::from_static(b"definitely not gzip"),
        };
        match frame.inflate() {
            Inflated::Fallback(bytes) => assert_eq!(bytes.as_ref(), b"definitely not gzip"),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_feeding_one_byte_at_a_time() {
        let first = Frame::plain(Bytes::from_static(b"abc")).encode().unwrap();
        let second = Frame::plain(Bytes::from_static(b"defg")).encode().unwrap();
        let stream: Vec<u8> = first.iter().chain(second.iter()).copied().collect();

        let mut decoder = FrameDecoder::new();
        let mut buf = BytesMut::new();
        let mut frames = Vec::new();

        for byte in stream {
            buf.put_u8(byte);
            while let Some(frame) = decoder.decode(&mut buf) {
                frames.push(frame);
            }
        }

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].payload.as_ref(), b"abc");
        assert_eq!(frames[1].payload.as_ref(), b"defg");
    }

    #[test]
    fn test_empty_payload_frame() {
        let frame = Frame::plain(Bytes::new());
        let encoded = frame.encode().unwrap();
        assert_eq!(encoded.len(), HEADER_SIZE);

        let mut decoder = FrameDecoder::new();
        let mut buf = BytesMut::from(encoded.as_ref());
        let decoded = decoder.decode(&mut buf).unwrap();
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn test_unknown_flag_bits_preserved() {
        let mut buf = BytesMut::new();
        buf.put_u8(0x83);
        buf.put_u32(1);
        buf.put_u8(b'x');

        let mut decoder = FrameDecoder::new();
        let frame = decoder.decode(&mut buf).unwrap();
        assert_eq!(frame.flags.bits(), 0x83);
        assert!(frame.flags.contains(FrameFlags::GZIP));
    }
}
