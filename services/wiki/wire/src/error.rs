//! Wire protocol error types.

use thiserror::Error;

/// Wire protocol errors
#[derive(Error, Debug)]
pub enum WireError {
    /// Buffer ended before a terminating byte was found
    #[error("truncated input")]
    Truncated,

    /// Varint wider than the 32-bit value domain
    #[error("varint overflow")]
    Overflow,

    /// Size limit exceeded
    #[error("size limit exceeded: {0}")]
    Size(usize),

    /// Gzip compression failed
    #[error("gzip compression failed")]
    Compress,

    /// Malformed field structure
    #[error("malformed field")]
    Malformed,
}
