//! Tolerant top-level field walking shared by the message decoders.

use wiki_wire::decode_varint;

use crate::ProtoError;

/// One decoded field value, with unhandled-but-valid wire types collapsed
/// into [`FieldValue::Skipped`] so callers can ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldValue<'a> {
    /// Wire type 0
    Varint(u32),
    /// Wire type 2
    Bytes(&'a [u8]),
    /// Wire types 1 and 5 (fixed64/fixed32), consumed and dropped
    Skipped,
}

/// Walks tag/value pairs at the top level of a message buffer.
pub(crate) struct FieldWalker<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> FieldWalker<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    /// Next `(field_number, value)` pair, or `None` at end of buffer.
    ///
    /// Structural damage (truncation, group wire types) is an error so the
    /// caller can discard the whole message.
    pub(crate) fn next_field(&mut self) -> Result<Option<(u32, FieldValue<'a>)>, ProtoError> {
        if self.offset >= self.buf.len() {
            return Ok(None);
        }

        let (tag, value_start) =
            decode_varint(self.buf, self.offset).map_err(|_| ProtoError::Truncated)?;
        let field_no = tag >> 3;
        let wire_type = (tag & 0x07) as u8;

        let (value, next_offset) = match wire_type {
            0 => {
                let (value, next) =
                    decode_varint(self.buf, value_start).map_err(|_| ProtoError::Truncated)?;
                (FieldValue::Varint(value), next)
            }
            1 => {
                let next = value_start.checked_add(8).ok_or(ProtoError::Truncated)?;
                (FieldValue::Skipped, next)
            }
            2 => {
                let (len, data_start) =
                    decode_varint(self.buf, value_start).map_err(|_| ProtoError::Truncated)?;
                let data_end = data_start
                    .checked_add(len as usize)
                    .ok_or(ProtoError::Truncated)?;
                if data_end > self.buf.len() {
                    return Err(ProtoError::Truncated);
                }
                (FieldValue::Bytes(&self.buf[data_start..data_end]), data_end)
            }
            5 => {
                let next = value_start.checked_add(4).ok_or(ProtoError::Truncated)?;
                (FieldValue::Skipped, next)
            }
            other => return Err(ProtoError::WireType(other)),
        };

        if next_offset > self.buf.len() {
            return Err(ProtoError::Truncated);
        }
        self.offset = next_offset;

        Ok(Some((field_no, value)))
    }
}

/// Lossy UTF-8 is not acceptable on the wire; invalid bytes decode as `""`.
pub(crate) fn string_value(value: FieldValue<'_>) -> String {
    match value {
        FieldValue::Bytes(bytes) => std::str::from_utf8(bytes).unwrap_or_default().to_string(),
        _ => String::new(),
    }
}

/// Varint fields read as `bool` (any non-zero value is true).
pub(crate) fn bool_value(value: FieldValue<'_>) -> bool {
    matches!(value, FieldValue::Varint(v) if v != 0)
}

/// Varint fields read as a raw enum integer; other wire types yield 0.
pub(crate) fn enum_value(value: FieldValue<'_>) -> u32 {
    match value {
        FieldValue::Varint(v) => v,
        _ => 0,
    }
}
