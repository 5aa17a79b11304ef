//! The outbound wiki request message.

use bytes::{BufMut, BytesMut};
use wiki_wire::{put_varint, WIRE_TYPE_LEN};

use crate::decode::{enum_value, string_value, FieldValue, FieldWalker};
use crate::types::{ModelType, RequestType, SymbolType};
use crate::{Metadata, ProtoError};

/// Field numbers of the `Request` message
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestField {
    /// Nested [`Metadata`] submessage
    Metadata = 1,
    /// [`RequestType`] enum
    RequestType = 2,
    /// Symbol name as shown in the editor
    SymbolName = 3,
    /// Symbol URI (document + position)
    SymbolUri = 4,
    /// Concatenated context sections
    Context = 5,
    /// [`SymbolType`] enum
    SymbolType = 6,
    /// Source language identifier
    Language = 7,
    /// [`ModelType`] enum
    ModelType = 8,
}

/// One article request, built once per call from collaborator outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Session and environment metadata
    pub metadata: Metadata,
    /// Kind of article requested
    pub request_type: RequestType,
    /// Symbol name as shown in the editor
    pub symbol_name: String,
    /// Symbol URI (document + position)
    pub symbol_uri: String,
    /// Context sections joined by blank lines, fixed order:
    /// file, usage, trace, quick-grep, full-grep
    pub context: String,
    /// Kind of the symbol
    pub symbol_type: SymbolType,
    /// Source language identifier
    pub language: String,
    /// Model tier
    pub model_type: ModelType,
}

fn put_string_field(buf: &mut BytesMut, field_no: u32, value: &str) {
    if value.is_empty() {
        return;
    }
    put_varint(buf, (field_no << 3) | u32::from(WIRE_TYPE_LEN));
    put_varint(buf, value.len() as u32);
    buf.put_slice(value.as_bytes());
}

fn put_enum_field(buf: &mut BytesMut, field_no: u32, value: u32) {
    if value == 0 {
        return;
    }
    put_varint(buf, field_no << 3);
    put_varint(buf, value);
}

impl Request {
    /// Encode the request message, metadata nested under field 1.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();

        let metadata = self.metadata.encode();
        if !metadata.is_empty() {
            put_varint(
                &mut buf,
                ((RequestField::Metadata as u32) << 3) | u32::from(WIRE_TYPE_LEN),
            );
            put_varint(&mut buf, metadata.len() as u32);
            buf.put_slice(&metadata);
        }

        put_enum_field(
            &mut buf,
            RequestField::RequestType as u32,
            self.request_type as u32,
        );
        put_string_field(&mut buf, RequestField::SymbolName as u32, &self.symbol_name);
        put_string_field(&mut buf, RequestField::SymbolUri as u32, &self.symbol_uri);
        put_string_field(&mut buf, RequestField::Context as u32, &self.context);
        put_enum_field(
            &mut buf,
            RequestField::SymbolType as u32,
            self.symbol_type as u32,
        );
        put_string_field(&mut buf, RequestField::Language as u32, &self.language);
        put_enum_field(
            &mut buf,
            RequestField::ModelType as u32,
            self.model_type as u32,
        );

        buf.to_vec()
    }

    /// Decode a request message; unknown fields are skipped and missing
    /// fields default.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtoError> {
        let mut request = Request::default();
        let mut walker = FieldWalker::new(buf);

        while let Some((field_no, value)) = walker.next_field()? {
            match field_no {
                n if n == RequestField::Metadata as u32 => {
                    if let FieldValue::Bytes(sub) = value {
                        request.metadata = Metadata::decode(sub);
                    }
                }
                n if n == RequestField::RequestType as u32 => {
                    request.request_type = RequestType::from_wire(enum_value(value));
                }
                n if n == RequestField::SymbolName as u32 => {
                    request.symbol_name = string_value(value);
                }
                n if n == RequestField::SymbolUri as u32 => {
                    request.symbol_uri = string_value(value);
                }
                n if n == RequestField::Context as u32 => {
                    request.context = string_value(value);
                }
                n if n == RequestField::SymbolType as u32 => {
                    request.symbol_type = SymbolType::from_wire(enum_value(value));
                }
                n if n == RequestField::Language as u32 => {
                    request.language = string_value(value);
                }
                n if n == RequestField::ModelType as u32 => {
                    request.model_type = ModelType::from_wire(enum_value(value));
                }
                _ => {}
            }
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Request {
        Request {
            metadata: Metadata {
                ide_name: "hostide".into(),
                workspace_id: "ws-1".into(),
                session_id: "aa".repeat(16),
                ..Default::default()
            },
            request_type: RequestType::Article,
            symbol_name: "parse_frame".into(),
            symbol_uri: "file:///src/frame.rs#L42".into(),
            context: "fn parse_frame(..)\n\nused in decode loop".into(),
            symbol_type: SymbolType::Function,
            language: "rust".into(),
            model_type: ModelType::Premium,
        }
    }

    #[test]
    fn test_request_round_trip() {
        let request = sample();
        let decoded = Request::decode(&request.encode()).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_default_request_encodes_empty() {
        assert!(Request::default().encode().is_empty());
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let mut encoded = sample().encode();
        // Field 99, varint wire type: tag (99 << 3) encodes as [0x98, 0x06]
        encoded.extend_from_slice(&[0x98, 0x06, 0x2a]);
        let decoded = Request::decode(&encoded).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_truncated_request_is_an_error() {
        let mut encoded = sample().encode();
        encoded.truncate(encoded.len() - 3);
        assert!(Request::decode(&encoded).is_err());
    }
}
