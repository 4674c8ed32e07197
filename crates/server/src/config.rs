//! Server configuration via `magellan.toml`
//!
//! A simple config file next to the process. On first start, a default
//! `magellan.toml` is created; to change settings, edit the file and restart.
//! The `magelland` binary can override individual values on the command
//! line.

use magellan_core::{Error, Result};
use magellan_store::DEFAULT_TABLE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "magellan.toml";

/// Server configuration loaded from `magellan.toml`.
///
/// # Example
///
/// ```toml
/// database = "magellan.db"
/// table = "mfMagellan"
/// bind = "0.0.0.0:8080"
/// api_token = "s3cret"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagellanConfig {
    /// SQLite database file path.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Destination table name.
    #[serde(default = "default_table")]
    pub table: String,
    /// Listen address for the HTTP server.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Expected `X-API-Token` value. An empty token is accepted and matched
    /// like any other; the binary warns about it at startup.
    #[serde(default)]
    pub api_token: String,
}

fn default_database() -> PathBuf {
    PathBuf::from("magellan.db")
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for MagellanConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            table: default_table(),
            bind: default_bind(),
            api_token: String::new(),
        }
    }
}

impl MagellanConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Magellan ingestion service configuration

# SQLite database file holding the destination table.
database = "magellan.db"

# Destination table. Created on first use; its column set grows with the
# documents you ingest and is never shrunk.
table = "mfMagellan"

# Listen address.
bind = "0.0.0.0:8080"

# Expected X-API-Token header value for POST /mfrequest.
api_token = ""
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse '{}': {}", path.display(), e)))
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::Config(format!("failed to write '{}': {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = MagellanConfig::default();
        assert_eq!(config.database, PathBuf::from("magellan.db"));
        assert_eq!(config.table, "mfMagellan");
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert!(config.api_token.is_empty());
    }

    #[test]
    fn default_toml_parses_correctly() {
        let config: MagellanConfig = toml::from_str(MagellanConfig::default_toml()).unwrap();
        assert_eq!(config.table, "mfMagellan");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: MagellanConfig = toml::from_str("api_token = \"t\"").unwrap();
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.api_token, "t");
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        MagellanConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = MagellanConfig::from_file(&path).unwrap();
        assert_eq!(config.table, "mfMagellan");
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        std::fs::write(&path, "table = \"custom\"\n").unwrap();
        MagellanConfig::write_default_if_missing(&path).unwrap();

        let config = MagellanConfig::from_file(&path).unwrap();
        assert_eq!(config.table, "custom");
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = MagellanConfig::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "table = [not toml").unwrap();
        assert!(MagellanConfig::from_file(&path).is_err());
    }
}
