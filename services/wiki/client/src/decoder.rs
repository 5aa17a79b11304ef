//! Incremental decoding of the multiplexed response stream.
//!
//! The decoder owns an append-only receive buffer fed one network chunk at
//! a time. Each complete frame is classified (JSON diagnostic vs. data),
//! inflated, decoded, and routed to the article or followup channel. Every
//! failure mode below the transport is recovered locally: a bad gzip
//! payload falls back to raw bytes, an undecodable protobuf frame is
//! skipped, and a JSON frame is recorded as a diagnostic — none of them
//! abort the stream.

use bytes::BytesMut;
use serde::Deserialize;
use tracing::{debug, warn};
use wiki_proto::ResponseDelta;
use wiki_wire::{Frame, FrameDecoder};

use crate::StreamEvent;

/// Case-insensitive conversation-id suffix selecting the followup channel.
pub const FOLLOWUP_SUFFIX: &str = "-followup";

/// Diagnostic payload of a JSON end-of-stream/error frame.
///
/// Parsed and retained for diagnostics only; a notice never aborts the
/// decode loop, and the absence of article text is what ultimately signals
/// failure to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceNotice {
    /// Machine-readable code, when the payload carries one
    #[serde(default)]
    pub code: String,
    /// Human-readable message, when the payload carries one
    #[serde(default)]
    pub message: String,
    /// Raw JSON text as received
    #[serde(skip)]
    pub raw: String,
}

impl ServiceNotice {
    fn parse(text: &str) -> Self {
        let mut notice: ServiceNotice = serde_json::from_str(text).unwrap_or_default();
        notice.raw = text.to_string();
        notice
    }
}

/// How a single frame was consumed
#[derive(Debug)]
enum FrameOutcome {
    /// Valid data frame
    Delta(ResponseDelta),
    /// JSON end-of-stream/error frame
    Notice(ServiceNotice),
    /// Undecodable data frame, dropped without aborting the stream
    Skip,
}

/// True when `conversation_id` selects the followup channel.
fn is_followup_conversation(conversation_id: &str) -> bool {
    let id = conversation_id.as_bytes();
    let suffix = FOLLOWUP_SUFFIX.as_bytes();
    id.len() >= suffix.len()
        && id[id.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// Stateful incremental parser for one response stream.
///
/// Each call owns its own instance; the decode loop is synchronous and
/// non-reentrant, and emitted events preserve byte-stream order exactly.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    frames: FrameDecoder,
    buf: BytesMut,
    article: String,
    followups: String,
    done: bool,
    notices: Vec<ServiceNotice>,
}

impl StreamDecoder {
    /// Create a decoder with empty accumulators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one network chunk and drain every frame it completes.
    ///
    /// Returns the logical events routed from those frames, in the exact
    /// order the frames were parsed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buf.extend_from_slice(chunk);
        self.drain()
    }

    /// Run the decode loop once more at end-of-input.
    ///
    /// Any leftover bytes that never became a complete frame are
    /// discarded silently.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let events = self.drain();
        if !self.buf.is_empty() {
            debug!(
                "discarding {} trailing bytes of an incomplete frame",
                self.buf.len()
            );
            self.buf.clear();
        }
        events
    }

    /// Article text accumulated so far (ordered concatenation of
    /// article-channel deltas).
    pub fn article_text(&self) -> &str {
        &self.article
    }

    /// Raw followup accumulator (unsplit, undeduplicated).
    pub fn followup_text(&self) -> &str {
        &self.followups
    }

    /// Whether the completion flag has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// JSON diagnostic frames seen so far.
    pub fn notices(&self) -> &[ServiceNotice] {
        &self.notices
    }

    fn drain(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        while let Some(frame) = self.frames.decode(&mut self.buf) {
            match self.classify(frame) {
                FrameOutcome::Delta(delta) => self.route(delta, &mut events),
                FrameOutcome::Notice(notice) => {
                    warn!(
                        code = notice.code.as_str(),
                        "service notice frame: {}",
                        if notice.message.is_empty() {
                            notice.raw.as_str()
                        } else {
                            notice.message.as_str()
                        }
                    );
                    self.notices.push(notice);
                }
                FrameOutcome::Skip => {}
            }
        }
        events
    }

    fn classify(&self, frame: Frame) -> FrameOutcome {
        let payload = frame.inflate().into_bytes();

        // JSON end-of-stream/error frames start with '{' or '[' once
        // left-trimmed; everything else is protobuf data.
        let text = String::from_utf8_lossy(&payload);
        let trimmed = text.trim_start();
        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            return FrameOutcome::Notice(ServiceNotice::parse(trimmed));
        }

        match ResponseDelta::decode(&payload) {
            Ok(delta) => FrameOutcome::Delta(delta),
            Err(err) => {
                warn!("skipping undecodable frame ({err})");
                FrameOutcome::Skip
            }
        }
    }

    fn route(&mut self, delta: ResponseDelta, events: &mut Vec<StreamEvent>) {
        if delta.is_article_done {
            self.done = true;
            events.push(StreamEvent::Done);
        }

        if !delta.text_delta.is_empty() {
            if is_followup_conversation(&delta.conversation_id) {
                self.followups.push_str(&delta.text_delta);
                events.push(StreamEvent::Followup(delta.text_delta));
            } else {
                self.article.push_str(&delta.text_delta);
                events.push(StreamEvent::Article(delta.text_delta));
            }
        }

        // Followup blocks always belong to the followup channel, whatever
        // the conversation id says
        if !delta.followup_questions.is_empty() {
            self.followups.push_str(&delta.followup_questions);
            events.push(StreamEvent::Followup(delta.followup_questions));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn data_frame(delta: &ResponseDelta) -> Vec<u8> {
        Frame::plain(Bytes::from(delta.encode()))
            .encode()
            .unwrap()
            .to_vec()
    }

    fn text_delta(text: &str, conversation_id: &str, done: bool) -> ResponseDelta {
        ResponseDelta {
            text_delta: text.into(),
            conversation_id: conversation_id.into(),
            is_article_done: done,
            followup_questions: String::new(),
        }
    }

    #[test]
    fn test_two_frame_article() {
        let mut decoder = StreamDecoder::new();
        let mut stream = data_frame(&text_delta("Hello ", "", false));
        stream.extend_from_slice(&data_frame(&text_delta("world", "", true)));

        let events = decoder.push(&stream);
        decoder.finish();

        assert_eq!(
            events,
            vec![
                StreamEvent::Article("Hello ".into()),
                StreamEvent::Done,
                StreamEvent::Article("world".into()),
            ]
        );
        assert_eq!(decoder.article_text(), "Hello world");
        assert!(decoder.is_done());
        assert!(decoder.followup_text().is_empty());
    }

    #[test]
    fn test_channel_demux_by_suffix() {
        let mut decoder = StreamDecoder::new();
        decoder.push(&data_frame(&text_delta("a", "abc-followup", false)));
        decoder.push(&data_frame(&text_delta("b", "ABC-FOLLOWUP", false)));
        decoder.push(&data_frame(&text_delta("c", "abc", false)));
        decoder.push(&data_frame(&text_delta("d", "", false)));
        decoder.push(&data_frame(&text_delta("e", "-followup", false)));

        assert_eq!(decoder.article_text(), "cd");
        assert_eq!(decoder.followup_text(), "abe");
    }

    #[test]
    fn test_followup_block_ignores_conversation_id() {
        let mut decoder = StreamDecoder::new();
        let delta = ResponseDelta {
            text_delta: "article text".into(),
            conversation_id: "main".into(),
            is_article_done: false,
            followup_questions: "Why?\nHow?".into(),
        };
        let events = decoder.push(&data_frame(&delta));

        assert_eq!(
            events,
            vec![
                StreamEvent::Article("article text".into()),
                StreamEvent::Followup("Why?\nHow?".into()),
            ]
        );
        assert_eq!(decoder.followup_text(), "Why?\nHow?");
    }

    #[test]
    fn test_corrupt_middle_frame_is_skipped() {
        let mut decoder = StreamDecoder::new();
        let mut stream = data_frame(&text_delta("first ", "", false));
        // Structurally invalid protobuf: length-delimited field claiming
        // more bytes than the payload holds
        stream.extend_from_slice(
            &Frame::plain(Bytes::from_static(&[0x0a, 0x7f, b'x']))
                .encode()
                .unwrap(),
        );
        stream.extend_from_slice(&data_frame(&text_delta("third", "", false)));

        decoder.push(&stream);
        assert_eq!(decoder.article_text(), "first third");
    }

    #[test]
    fn test_json_notice_frame_is_diagnostic_only() {
        let mut decoder = StreamDecoder::new();
        let notice = Frame::plain(Bytes::from_static(br#"  {"code":"internal","message":"x"}"#))
            .encode()
            .unwrap();

        let mut stream = notice.to_vec();
        stream.extend_from_slice(&data_frame(&text_delta("still here", "", false)));
        let events = decoder.push(&stream);

        assert_eq!(events, vec![StreamEvent::Article("still here".into())]);
        assert_eq!(decoder.notices().len(), 1);
        assert_eq!(decoder.notices()[0].code, "internal");
        assert_eq!(decoder.notices()[0].message, "x");
    }

    #[test]
    fn test_compressed_and_plain_frames_interleave() {
        let mut decoder = StreamDecoder::new();
        let mut stream = Frame::compressed(&text_delta("zipped ", "", false).encode())
            .unwrap()
            .encode()
            .unwrap()
            .to_vec();
        stream.extend_from_slice(&data_frame(&text_delta("plain", "", true)));

        decoder.push(&stream);
        assert_eq!(decoder.article_text(), "zipped plain");
        assert!(decoder.is_done());
    }

    #[test]
    fn test_chunked_feeding_preserves_event_order() {
        let mut stream = data_frame(&text_delta("one", "", false));
        stream.extend_from_slice(&data_frame(&text_delta("q1", "x-followup", false)));
        stream.extend_from_slice(&data_frame(&text_delta("two", "", true)));

        let mut decoder = StreamDecoder::new();
        let mut events = Vec::new();
        for chunk in stream.chunks(4) {
            events.extend(decoder.push(chunk));
        }
        events.extend(decoder.finish());

        assert_eq!(
            events,
            vec![
                StreamEvent::Article("one".into()),
                StreamEvent::Followup("q1".into()),
                StreamEvent::Done,
                StreamEvent::Article("two".into()),
            ]
        );
    }

    #[test]
    fn test_trailing_partial_frame_is_discarded() {
        let mut decoder = StreamDecoder::new();
        let mut stream = data_frame(&text_delta("kept", "", false));
        // Header promising 64 payload bytes that never arrive
        stream.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x40, 0xaa]);

        decoder.push(&stream);
        let events = decoder.finish();
        assert!(events.is_empty());
        assert_eq!(decoder.article_text(), "kept");
    }

    #[test]
    fn test_done_flag_is_idempotent() {
        let mut decoder = StreamDecoder::new();
        decoder.push(&data_frame(&text_delta("a", "", true)));
        decoder.push(&data_frame(&text_delta("b", "", true)));

        assert!(decoder.is_done());
        assert_eq!(decoder.article_text(), "ab");
    }
}
