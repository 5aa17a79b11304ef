//! Session and environment metadata nested inside every request.

use wiki_wire::{decode_string_fields, encode_string_field};

/// Field numbers of the `Metadata` message
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    /// Host IDE name
    IdeName = 1,
    /// Host IDE version
    IdeVersion = 2,
    /// Extension name
    ExtensionName = 3,
    /// Extension version
    ExtensionVersion = 4,
    /// API key credential
    ApiKey = 5,
    /// Auth token credential
    AuthToken = 6,
    /// BCP-47 locale
    Locale = 7,
    /// OS info as an embedded JSON string
    OsInfo = 8,
    /// Hardware info as an embedded JSON string
    HardwareInfo = 9,
    /// Process-durable workspace identifier
    WorkspaceId = 10,
    /// Per-request session identifier
    SessionId = 11,
}

/// Flat record of session/environment fields.
///
/// All fields are strings. Absent values serialize as the empty string:
/// empty fields are skipped on the wire and default back to `""` on
/// decode. The workspace id is a process-durable identifier owned by the
/// caller; the session id is minted fresh per request and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Host IDE name
    pub ide_name: String,
    /// Host IDE version
    pub ide_version: String,
    /// Extension name
    pub extension_name: String,
    /// Extension version
    pub extension_version: String,
    /// API key credential
    pub api_key: String,
    /// Auth token credential
    pub auth_token: String,
    /// BCP-47 locale
    pub locale: String,
    /// OS info as an embedded JSON string
    pub os_info: String,
    /// Hardware info as an embedded JSON string
    pub hardware_info: String,
    /// Process-durable workspace identifier
    pub workspace_id: String,
    /// Per-request session identifier
    pub session_id: String,
}

impl Metadata {
    fn fields(&self) -> [(MetadataField, &str); 11] {
        [
            (MetadataField::IdeName, &self.ide_name),
            (MetadataField::IdeVersion, &self.ide_version),
            (MetadataField::ExtensionName, &self.extension_name),
            (MetadataField::ExtensionVersion, &self.extension_version),
            (MetadataField::ApiKey, &self.api_key),
            (MetadataField::AuthToken, &self.auth_token),
            (MetadataField::Locale, &self.locale),
            (MetadataField::OsInfo, &self.os_info),
            (MetadataField::HardwareInfo, &self.hardware_info),
            (MetadataField::WorkspaceId, &self.workspace_id),
            (MetadataField::SessionId, &self.session_id),
        ]
    }

    /// Encode as a string-only submessage.
    ///
    /// This schema has only top-level string fields, so it goes through
    /// the scan-based field codec rather than a dedicated writer.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for (field, value) in self.fields() {
            if !value.is_empty() {
                buf.extend_from_slice(&encode_string_field(field as u32, value));
            }
        }
        buf
    }

    /// Decode via the scan-based field codec; missing fields default to `""`.
    pub fn decode(buf: &[u8]) -> Self {
        let mut fields = decode_string_fields(buf);
        let mut take = |field: MetadataField| fields.remove(&(field as u32)).unwrap_or_default();

        Self {
            ide_name: take(MetadataField::IdeName),
            ide_version: take(MetadataField::IdeVersion),
            extension_name: take(MetadataField::ExtensionName),
            extension_version: take(MetadataField::ExtensionVersion),
            api_key: take(MetadataField::ApiKey),
            auth_token: take(MetadataField::AuthToken),
            locale: take(MetadataField::Locale),
            os_info: take(MetadataField::OsInfo),
            hardware_info: take(MetadataField::HardwareInfo),
            workspace_id: take(MetadataField::WorkspaceId),
            session_id: take(MetadataField::SessionId),
        }
    }
}
