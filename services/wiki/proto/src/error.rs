//! Message model error types.

use thiserror::Error;

/// Message decoding errors
#[derive(Error, Debug)]
pub enum ProtoError {
    /// Message ended inside a tag, length, or value
    #[error("truncated message")]
    Truncated,

    /// Wire type this model cannot walk past (groups, reserved values)
    #[error("unsupported wire type {0}")]
    WireType(u8),
}
