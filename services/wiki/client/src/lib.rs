//! Streaming RPC client for the wiki service.
//!
//! One request goes out as a single compressed envelope; the response is a
//! stream of envelopes carrying protobuf-encoded deltas, interleaved with
//! JSON diagnostic frames, multiplexing two logical channels — article
//! text and follow-up questions — told apart by a conversation-id naming
//! convention and terminated by an explicit completion flag.
//!
//! Two call modes are offered: **buffered** (whole body, then decode and
//! finalize into one string) and **streaming** (each network chunk is fed
//! through [`StreamDecoder`] and a caller callback sees every logical
//! event in byte-stream order, no finalization applied).
//!
//! Each call owns its own decoder state; nothing process-wide is mutated
//! here. The persisted workspace identity is handed in explicitly via
//! [`WorkspaceIdentity`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod article;
pub mod client;
pub mod context;
pub mod decoder;
pub mod error;
pub mod event;

// Re-export main types
pub use article::{dedup_followup_lines, render_with_followups, Article};
pub use client::{ArticleQuery, ClientConfig, WikiClient, DEFAULT_ENDPOINT, PROTOCOL_VERSION};
pub use context::{mint_session_id, Credentials, SymbolContext, WorkspaceIdentity};
pub use decoder::{ServiceNotice, StreamDecoder, FOLLOWUP_SUFFIX};
pub use error::ClientError;
pub use event::StreamEvent;
