//! picstash/crates/configs/src/lib.rs
//!
//! Layered configuration: `.env` file (if present), then `PICSTASH__*`
//! environment variables. Secrets are wrapped in `secrecy` so they never
//! appear in debug output.
//!
//! Storage and tagger credentials may legitimately be absent at boot; the
//! adapters fail fast per request with a "not configured" signal instead of
//! refusing to start.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub tagger: TaggerSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub access_key_id: String,
    pub secret_access_key: SecretString,
    pub region: String,
    pub bucket: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: SecretString::from(""),
            region: "us-east-1".into(),
            bucket: String::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TaggerSettings {
    pub api_key: SecretString,
    pub model: String,
    pub endpoint: String,
}

impl Default for TaggerSettings {
    fn default() -> Self {
        Self {
            api_key: SecretString::from(""),
            model: "gpt-4o-mini".into(),
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    /// Salt for deriving owner ids from bearer tokens.
    pub identity_salt: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            identity_salt: "picstash".into(),
        }
    }
}

impl Settings {
    /// Loads settings from the environment, e.g.
    /// `PICSTASH__STORAGE__ACCESS_KEY_ID`, `PICSTASH__SERVER__PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("PICSTASH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        debug!("configuration loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_leave_credentials_empty_but_region_set() {
        let settings = Settings {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            tagger: TaggerSettings::default(),
            auth: AuthSettings::default(),
        };
        assert!(settings.storage.access_key_id.is_empty());
        assert!(settings.storage.secret_access_key.expose_secret().is_empty());
        assert_eq!(settings.storage.region, "us-east-1");
        assert_eq!(settings.tagger.model, "gpt-4o-mini");
        assert_eq!(settings.server.port, 8080);
    }
}
