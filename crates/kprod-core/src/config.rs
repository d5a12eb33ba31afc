//! Persisted configuration.
//!
//! Settings live in a single JSON document in the user's home directory. A
//! missing file yields the documented defaults; a malformed file is an error
//! the caller must treat as fatal. Files are written owner-readable only.
//!
//! The [`ConfigStore`] trait keeps the application layer independent of the
//! filesystem so tests can substitute an in-memory store.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, PersistError},
    settings::ConnectionSettings,
};

/// File name of the configuration file inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".kafka-producer.json";

/// On-disk configuration record.
///
/// Keys missing from an existing file take zero values rather than the
/// defaults used when no file exists at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedConfig {
    /// Bootstrap brokers.
    pub brokers: Vec<String>,
    /// Destination topic.
    pub topic: String,
    /// Client certificate path.
    pub cert_file: String,
    /// Client private key path.
    pub key_file: String,
    /// CA certificate path.
    pub ca_file: String,
    /// Serde name for message keys.
    pub key_serde: String,
    /// Serde name for message values.
    pub value_serde: String,
    /// Whether mutual TLS was enabled when last saved.
    pub use_auth: bool,
}

impl PersistedConfig {
    /// Configuration used when no file exists.
    pub fn documented_default() -> Self {
        ConnectionSettings::default().to_persisted()
    }
}

/// Load/save access to persisted settings.
pub trait ConfigStore: Send + Sync {
    /// Human-readable location of the backing store.
    fn location(&self) -> String;

    /// Load the configuration, or the documented default when none exists.
    fn load(&self) -> Result<PersistedConfig, ConfigError>;

    /// Replace the stored configuration.
    fn save(&self, config: &PersistedConfig) -> Result<(), PersistError>;
}

/// JSON file backed [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.kafka-producer.json`.
    pub fn at_default_location() -> Result<Self, ConfigError> {
        Self::default_path().map(Self::new).ok_or(ConfigError::NoHomeDir)
    }

    /// `~/.kafka-producer.json`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Path of the configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, err: &io::Error) -> PersistError {
        PersistError::Write { path: self.path.clone(), reason: err.to_string() }
    }
}

impl ConfigStore for FileConfigStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<PersistedConfig, ConfigError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no config file, using defaults");
                return Ok(PersistedConfig::documented_default());
            },
            Err(e) => {
                return Err(ConfigError::Read { path: self.path.clone(), reason: e.to_string() });
            },
        };

        let config = serde_json::from_slice(&data).map_err(|e| ConfigError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!(path = %self.path.display(), "loaded config");
        Ok(config)
    }

    fn save(&self, config: &PersistedConfig) -> Result<(), PersistError> {
        let data =
            serde_json::to_vec_pretty(config).map_err(|e| PersistError::Serialize(e.to_string()))?;

        let mut file = owner_only_options().open(&self.path).map_err(|e| self.write_err(&e))?;
        restrict_permissions(&self.path).map_err(|e| self.write_err(&e))?;
        file.write_all(&data).map_err(|e| self.write_err(&e))?;
        file.sync_all().map_err(|e| self.write_err(&e))?;

        tracing::info!(path = %self.path.display(), "saved config");
        Ok(())
    }
}

fn owner_only_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options
}

/// `mode` only applies when the file is created; existing files are tightened
/// explicitly.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_default_values() {
        let config = PersistedConfig::documented_default();
        assert_eq!(config.brokers, vec!["localhost:9092"]);
        assert_eq!(config.topic, "test-topic");
        assert!(!config.use_auth);
        assert_eq!(config.key_serde, "json");
        assert_eq!(config.value_serde, "json");
    }

    #[test]
    fn missing_keys_take_zero_values() {
        let config: PersistedConfig = serde_json::from_str(r#"{"topic":"orders"}"#).unwrap();
        assert_eq!(config.topic, "orders");
        assert!(config.brokers.is_empty());
        assert!(config.key_serde.is_empty());
    }

    #[test]
    fn persisted_layout() {
        let config = PersistedConfig {
            brokers: vec!["k1:9093".into()],
            topic: "orders".into(),
            cert_file: "/c.pem".into(),
            key_file: "/k.pem".into(),
            ca_file: "/ca.pem".into(),
            key_serde: "string".into(),
            value_serde: "json".into(),
            use_auth: true,
        };

        insta::assert_snapshot!(serde_json::to_string_pretty(&config).unwrap(), @r#"
        {
          "brokers": [
            "k1:9093"
          ],
          "topic": "orders",
          "cert_file": "/c.pem",
          "key_file": "/k.pem",
          "ca_file": "/ca.pem",
          "key_serde": "string",
          "value_serde": "json",
          "use_auth": true
        }
        "#);
    }
}
