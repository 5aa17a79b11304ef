//! Explicit call-context collaborators.
//!
//! The source design kept the workspace id and environment fingerprints in
//! process-wide singletons; here they are plain values constructed once
//! and passed into the client, with create-once/read-many semantics owned
//! by the caller.

use std::io;
use std::path::Path;

use rand::RngCore;
use serde_json::json;

/// Opaque credential pair supplied by the host's auth layer.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// API key
    pub api_key: String,
    /// Auth token
    pub auth_token: String,
}

/// Process-durable identity plus environment fingerprints.
#[derive(Debug, Clone)]
pub struct WorkspaceIdentity {
    /// UUIDv4-shaped identifier, generated once and persisted
    pub workspace_id: String,
    /// OS info as an embedded JSON string
    pub os_info: String,
    /// Hardware info as an embedded JSON string
    pub hardware_info: String,
}

impl WorkspaceIdentity {
    /// Build an identity around an already-known workspace id, gathering
    /// the OS and hardware fingerprints from the running process.
    pub fn gather(workspace_id: String) -> Self {
        let os_info = json!({
            "platform": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "family": std::env::consts::FAMILY,
        })
        .to_string();

        let cpus = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(1);
        let hardware_info = json!({ "cpus": cpus }).to_string();

        Self {
            workspace_id,
            os_info,
            hardware_info,
        }
    }

    /// Read the persisted workspace id from `path`, or mint a UUIDv4 and
    /// persist it. Called once per process; the result is read-many.
    pub fn load_or_create(path: &Path) -> io::Result<Self> {
        let existing = match std::fs::read_to_string(path) {
            Ok(contents) => {
                let id = contents.trim().to_string();
                if id.is_empty() {
                    None
                } else {
                    Some(id)
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => return Err(err),
        };

        let workspace_id = match existing {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &id)?;
                id
            }
        };

        Ok(Self::gather(workspace_id))
    }
}

/// The five context sections supplied by the editor side, fixed order.
#[derive(Debug, Clone, Default)]
pub struct SymbolContext {
    /// Surrounding file excerpt
    pub file: String,
    /// Usage sites
    pub usage: String,
    /// Trace output
    pub trace: String,
    /// Quick grep results
    pub quick_grep: String,
    /// Full grep results
    pub full_grep: String,
}

impl SymbolContext {
    /// Join the non-empty sections with one blank line, in the fixed
    /// order file, usage, trace, quick-grep, full-grep.
    pub fn render(&self) -> String {
        [
            &self.file,
            &self.usage,
            &self.trace,
            &self.quick_grep,
            &self.full_grep,
        ]
        .iter()
        .filter(|section| !section.is_empty())
        .map(|section| section.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
    }
}

/// Mint a fresh per-request session id: 32 lowercase hex chars, no
/// separators, never persisted.
pub fn mint_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{:032x}", u128::from_be_bytes(bytes))
}
