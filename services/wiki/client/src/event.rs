//! Logical events of the streaming decode.

/// One logical event emitted while decoding the response stream.
///
/// Streaming mode hands these to the caller in the exact order the
/// underlying frames were parsed; buffered mode folds them into an
/// [`Article`](crate::Article) instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Article-channel text delta
    Article(String),
    /// Followup-channel text: a delta, or a newline-separated block
    Followup(String),
    /// The article completion flag was seen (idempotent; may repeat)
    Done,
}
