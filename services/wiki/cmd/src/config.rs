//! Configuration handling for the wiki CLI.
//!
//! This module reads the YAML config file and environment variables,
//! providing a unified configuration interface. Flags override both.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Wiki CLI configuration
#[derive(Debug, Clone)]
pub struct WikiConfig {
    /// Streaming RPC endpoint URL
    pub endpoint: String,
    /// API key credential
    pub api_key: String,
    /// Auth token credential
    pub auth_token: String,
    /// BCP-47 locale sent in request metadata
    pub locale: String,
    /// Host IDE name reported in metadata
    pub ide_name: String,
    /// Host IDE version reported in metadata
    pub ide_version: String,
    /// Model tier (abstract wire name or short name)
    pub model: String,
    /// Data directory holding the persisted workspace id
    pub data_dir: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            endpoint: wiki_client::DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            auth_token: String::new(),
            locale: "en".to_string(),
            ide_name: "cli".to_string(),
            ide_version: env!("CARGO_PKG_VERSION").to_string(),
            model: String::new(),
            data_dir: ".sourcewiki".to_string(),
        }
    }
}

/// Root configuration structure (matches the YAML layout)
#[derive(Debug, Default, Deserialize)]
struct RootConfig {
    endpoint: Option<String>,
    credentials: Option<CredentialsConfig>,
    locale: Option<String>,
    ide: Option<IdeConfig>,
    model: Option<String>,
    data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CredentialsConfig {
    api_key: Option<String>,
    auth_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct IdeConfig {
    name: Option<String>,
    version: Option<String>,
}

impl WikiConfig {
    /// Load configuration from file and environment variables.
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(content) = std::fs::read_to_string(&config_path) {
            match serde_yaml::from_str::<RootConfig>(&content) {
                Ok(root) => {
                    config.apply_root_config(root);
                    info!("Loaded configuration from {:?}", config_path.as_ref());
                }
                Err(err) => {
                    warn!(
                        "Failed to parse config file {:?} ({err}), using defaults",
                        config_path.as_ref()
                    );
                }
            }
        }

        config.apply_environment_overrides();
        Ok(config)
    }

    fn apply_root_config(&mut self, root: RootConfig) {
        if let Some(endpoint) = root.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(credentials) = root.credentials {
            if let Some(api_key) = credentials.api_key {
                self.api_key = api_key;
            }
            if let Some(auth_token) = credentials.auth_token {
                self.auth_token = auth_token;
            }
        }
        if let Some(locale) = root.locale {
            self.locale = locale;
        }
        if let Some(ide) = root.ide {
            if let Some(name) = ide.name {
                self.ide_name = name;
            }
            if let Some(version) = ide.version {
                self.ide_version = version;
            }
        }
        if let Some(model) = root.model {
            self.model = model;
        }
        if let Some(data_dir) = root.data_dir {
            self.data_dir = data_dir;
        }
    }

    /// Apply environment variable overrides.
    fn apply_environment_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var("WIKI_ENDPOINT") {
            self.endpoint = endpoint;
            info!("Endpoint overridden by environment");
        }
        if let Ok(api_key) = std::env::var("WIKI_API_KEY") {
            self.api_key = api_key;
        }
        if let Ok(auth_token) = std::env::var("WIKI_AUTH_TOKEN") {
            self.auth_token = auth_token;
        }
        if let Ok(locale) = std::env::var("WIKI_LOCALE") {
            self.locale = locale;
        }
        if let Ok(data_dir) = std::env::var("WIKI_DATA_DIR") {
            self.data_dir = data_dir;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = WikiConfig::default();
        assert_eq!(config.endpoint, wiki_client::DEFAULT_ENDPOINT);
        assert_eq!(config.locale, "en");
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let yaml_content = r#"
endpoint: https://wiki.example.com/rpc
credentials:
  api_key: key-abc
  auth_token: token-def
locale: de-DE
ide:
  name: hostide
  version: "1.92.0"
model: DEEP_WIKI_MODEL_TYPE_PREMIUM
data_dir: /tmp/wiki-data
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = WikiConfig::load_from_file(temp_file.path()).unwrap();

        assert_eq!(config.endpoint, "https://wiki.example.com/rpc");
        assert_eq!(config.api_key, "key-abc");
        assert_eq!(config.auth_token, "token-def");
        assert_eq!(config.locale, "de-DE");
        assert_eq!(config.ide_name, "hostide");
        assert_eq!(config.ide_version, "1.92.0");
        assert_eq!(config.model, "DEEP_WIKI_MODEL_TYPE_PREMIUM");
        assert_eq!(config.data_dir, "/tmp/wiki-data");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = WikiConfig::load_from_file("/nonexistent/wiki.yaml").unwrap();
        assert_eq!(config.endpoint, wiki_client::DEFAULT_ENDPOINT);
    }
}
