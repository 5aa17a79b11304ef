//! Message model for the wiki service.
//!
//! This crate defines the two structured messages of the wiki RPC —
//! [`Request`] (with its nested [`Metadata`]) and [`ResponseDelta`] — as
//! strongly-typed records with explicit field-code tables, plus the enum
//! tables mapping abstract wire names to their integers.
//!
//! Encoding is hand-rolled over the varint and field codecs of
//! `wiki-wire`; there are no generated bindings. Decoding is tolerant:
//! unknown fields are skipped by wire type and missing scalars default to
//! `""`/`0`. The all-string `Metadata` schema goes through the scan-based
//! field codec directly.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod decode;
pub mod error;
pub mod metadata;
pub mod request;
pub mod response;
pub mod types;

// Re-export main types
pub use error::ProtoError;
pub use metadata::{Metadata, MetadataField};
pub use request::{Request, RequestField};
pub use response::{ResponseDelta, ResponseField};
pub use types::{ModelType, RequestType, SymbolType};
