//! Schema-less protobuf field scanning.
//!
//! Small single-purpose payloads do not justify a full message schema.
//! This module writes one length-delimited string field and scans an
//! arbitrary buffer for top-level length-delimited fields by number.
//! Malformed input is a soft miss, never an error.

use std::collections::BTreeMap;

use bytes::{BufMut, BytesMut};

use crate::varint::{decode_varint, put_varint};

/// Protobuf wire type 2: length-delimited (strings, bytes, submessages).
pub const WIRE_TYPE_LEN: u8 = 2;

/// Encode a single length-delimited string field.
///
/// Emits the field tag `(field_no << 3) | 2`, the UTF-8 byte count as a
/// varint, then the bytes themselves.
pub fn encode_string_field(field_no: u32, value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut buf = BytesMut::with_capacity(bytes.len() + 2 * crate::MAX_VARINT32_LEN);
    put_varint(&mut buf, (field_no << 3) | u32::from(WIRE_TYPE_LEN));
    put_varint(&mut buf, bytes.len() as u32);
    buf.put_slice(bytes);
    buf.to_vec()
}

/// Return the value of the first field with number 1 and wire type 2.
///
/// Scans tag/length/value triples from offset 0. A malformed tag, a
/// non-length-delimited wire type, or a truncated length/value ends the
/// scan with `None`.
pub fn decode_first_string_field(buf: &[u8]) -> Option<String> {
    let mut offset = 0;
    while offset < buf.len() {
        let (tag, value_start) = decode_varint(buf, offset).ok()?;
        if tag & 0x07 != u32::from(WIRE_TYPE_LEN) {
            return None;
        }
        let (len, data_start) = decode_varint(buf, value_start).ok()?;
        let data_end = data_start.checked_add(len as usize)?;
        if data_end > buf.len() {
            return None;
        }
        if tag >> 3 == 1 {
            return String::from_utf8(buf[data_start..data_end].to_vec()).ok();
        }
        offset = data_end;
    }
    None
}

/// Collect every top-level length-delimited field by number.
///
/// The scan stops, without failing, at the first non-length-delimited wire
/// type or truncation; whatever was collected so far is returned.
pub fn decode_string_fields(buf: &[u8]) -> BTreeMap<u32, String> {
    let mut fields = BTreeMap::new();
    let mut offset = 0;

    while offset < buf.len() {
        let (tag, value_start) = match decode_varint(buf, offset) {
            Ok(parsed) => parsed,
            Err(_) => break,
        };
        if tag & 0x07 != u32::from(WIRE_TYPE_LEN) {
            break;
        }
        let (len, data_start) = match decode_varint(buf, value_start) {
            Ok(parsed) => parsed,
            Err(_) => break,
        };
        let data_end = match data_start.checked_add(len as usize) {
            Some(end) if end <= buf.len() => end,
            _ => break,
        };
        if let Ok(value) = std::str::from_utf8(&buf[data_start..data_end]) {
            fields.insert(tag >> 3, value.to_string());
        }
        offset = data_end;
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_field_round_trip() {
        let encoded = encode_string_field(1, "hello");
        assert_eq!(encoded[0], (1 << 3) | 2);
        assert_eq!(decode_first_string_field(&encoded).as_deref(), Some("hello"));
    }

    #[test]
    fn test_first_field_skips_other_numbers() {
        let mut buf = encode_string_field(3, "skip me");
        buf.extend_from_slice(&encode_string_field(1, "found"));
        assert_eq!(decode_first_string_field(&buf).as_deref(), Some("found"));
    }

    #[test]
    fn test_malformed_input_is_soft_miss() {
        // Wire type 0 (varint) tag
        assert_eq!(decode_first_string_field(&[0x08, 0x01]), None);
        // Length longer than the buffer
        assert_eq!(decode_first_string_field(&[0x0a, 0x10, b'x']), None);
        // Truncated tag
        assert_eq!(decode_first_string_field(&[0x80]), None);
        assert_eq!(decode_first_string_field(&[]), None);
    }

    #[test]
    fn test_collect_fields_by_number() {
        let mut buf = encode_string_field(1, "one");
        buf.extend_from_slice(&encode_string_field(4, "four"));
        buf.extend_from_slice(&encode_string_field(2, "two"));

        let fields = decode_string_fields(&buf);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get(&1).map(String::as_str), Some("one"));
        assert_eq!(fields.get(&2).map(String::as_str), Some("two"));
        assert_eq!(fields.get(&4).map(String::as_str), Some("four"));
    }

    #[test]
    fn test_collect_stops_at_non_length_delimited() {
        let mut buf = encode_string_field(1, "kept");
        // Field 2, wire type 0 (varint) ends the scan
        buf.extend_from_slice(&[0x10, 0x2a]);
        buf.extend_from_slice(&encode_string_field(3, "dropped"));

        let fields = decode_string_fields(&buf);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get(&1).map(String::as_str), Some("kept"));
    }
}
