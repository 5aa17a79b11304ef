//! Client call errors.
//!
//! Frame-level problems (truncation, bad gzip, undecodable protobuf) are
//! always recovered inside the decode loop and never reach this type; only
//! transport failures and an empty result surface to the caller.

use thiserror::Error;

/// Errors surfaced to the caller of a wiki query
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server answered with a non-2xx status
    #[error("wiki service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: reqwest::StatusCode,
        /// Response body text, for the error message shown to the user
        body: String,
    },

    /// Connection or body-read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The whole stream carried no article text
    #[error("wiki service returned no article text")]
    EmptyResult,

    /// Outbound frame encoding failed
    #[error("request encoding failed: {0}")]
    Encode(#[from] wiki_wire::WireError),
}
