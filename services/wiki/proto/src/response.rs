//! One decoded unit of the response stream.

use bytes::{BufMut, BytesMut};
use wiki_wire::{decode_first_string_field, put_varint, WIRE_TYPE_LEN};

use crate::decode::{bool_value, string_value, FieldWalker};
use crate::ProtoError;

/// Field numbers of the `ResponseDelta` message
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseField {
    /// Incremental text
    TextDelta = 1,
    /// Conversation identifier; a `-followup` suffix selects the followup
    /// channel
    ConversationId = 2,
    /// Completion flag, idempotent
    IsArticleDone = 3,
    /// Newline-separated block of follow-up questions
    FollowupQuestions = 4,
}

/// One decoded unit from a single data frame.
///
/// Transient: produced and consumed entirely within one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseDelta {
    /// Incremental text for whichever channel the delta belongs to
    pub text_delta: String,
    /// Conversation identifier used for channel classification
    pub conversation_id: String,
    /// True once the article is complete; may be seen more than once
    pub is_article_done: bool,
    /// Newline-separated follow-up block, may arrive independently of
    /// `text_delta`
    pub followup_questions: String,
}

impl ResponseDelta {
    /// Decode a delta; unknown fields are skipped and missing fields
    /// default. Structural damage is an error so the caller can drop the
    /// frame.
    pub fn decode(buf: &[u8]) -> Result<Self, ProtoError> {
        let mut delta = ResponseDelta::default();
        let mut walker = FieldWalker::new(buf);

        while let Some((field_no, value)) = walker.next_field()? {
            match field_no {
                n if n == ResponseField::TextDelta as u32 => {
                    delta.text_delta = string_value(value);
                }
                n if n == ResponseField::ConversationId as u32 => {
                    delta.conversation_id = string_value(value);
                }
                n if n == ResponseField::IsArticleDone as u32 => {
                    delta.is_article_done = bool_value(value);
                }
                n if n == ResponseField::FollowupQuestions as u32 => {
                    delta.followup_questions = string_value(value);
                }
                _ => {}
            }
        }

        Ok(delta)
    }

    /// Encode a delta (server side of the schema; also exercised by the
    /// decoder tests).
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::new();

        for (field, value) in [
            (ResponseField::TextDelta, &self.text_delta),
            (ResponseField::ConversationId, &self.conversation_id),
        ] {
            if !value.is_empty() {
                put_varint(&mut buf, ((field as u32) << 3) | u32::from(WIRE_TYPE_LEN));
                put_varint(&mut buf, value.len() as u32);
                buf.put_slice(value.as_bytes());
            }
        }

        if self.is_article_done {
            put_varint(&mut buf, (ResponseField::IsArticleDone as u32) << 3);
            put_varint(&mut buf, 1);
        }

        if !self.followup_questions.is_empty() {
            put_varint(
                &mut buf,
                ((ResponseField::FollowupQuestions as u32) << 3) | u32::from(WIRE_TYPE_LEN),
            );
            put_varint(&mut buf, self.followup_questions.len() as u32);
            buf.put_slice(self.followup_questions.as_bytes());
        }

        buf.to_vec()
    }

    /// Fast path: pull `text_delta` out of a raw payload without walking
    /// the full schema (it is field 1, so the scan-based reader applies).
    pub fn peek_text_delta(buf: &[u8]) -> Option<String> {
        decode_first_string_field(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_round_trip() {
        let delta = ResponseDelta {
            text_delta: "Hello ".into(),
            conversation_id: "conv-7".into(),
            is_article_done: true,
            followup_questions: "Why?\nHow?".into(),
        };
        assert_eq!(ResponseDelta::decode(&delta.encode()).unwrap(), delta);
    }

    #[test]
    fn test_missing_fields_default() {
        let delta = ResponseDelta::decode(&[]).unwrap();
        assert_eq!(delta, ResponseDelta::default());
        assert!(!delta.is_article_done);
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let source = ResponseDelta {
            text_delta: "x".into(),
            ..Default::default()
        };
        let mut encoded = source.encode();
        // Field 12, varint wire type
        encoded.extend_from_slice(&[12 << 3, 0x05]);
        assert_eq!(ResponseDelta::decode(&encoded).unwrap(), source);
    }

    #[test]
    fn test_structural_damage_is_an_error() {
        // Length-delimited field 1 claiming 16 bytes with 1 present
        assert!(ResponseDelta::decode(&[0x0a, 0x10, b'x']).is_err());
        // Group wire type
        assert!(ResponseDelta::decode(&[0x0b]).is_err());
    }

    #[test]
    fn test_peek_text_delta() {
        let delta = ResponseDelta {
            text_delta: "peeked".into(),
            conversation_id: "conv".into(),
            ..Default::default()
        };
        assert_eq!(
            ResponseDelta::peek_text_delta(&delta.encode()).as_deref(),
            Some("peeked")
        );
    }
}
