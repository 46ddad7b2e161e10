//! CLI configuration.
//!
//! Loaded from environment variables with fallback to defaults. The database
//! path comes from the `--db` flag, then `DEPOT_DB_PATH`, then the platform
//! data directory.
//!
//! | Variable                      | Default                        |
//! |-------------------------------|--------------------------------|
//! | `DEPOT_DB_PATH`               | platform data dir / `depot.db` |
//! | `DEPOT_MAX_CONNECTIONS`       | `5`                            |
//! | `DEPOT_CONNECT_TIMEOUT_SECS`  | `30`                           |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use depot_db::DbConfig;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    pub connect_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load(db_flag: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_from(db_flag, |key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn load_from(
        db_flag: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let database_path = match (db_flag, lookup("DEPOT_DB_PATH")) {
            (Some(path), _) => path,
            (None, Some(path)) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_database_path()?,
        };

        Ok(AppConfig {
            database_path,

            max_connections: lookup("DEPOT_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::InvalidValue("DEPOT_MAX_CONNECTIONS".to_string()))?,

            connect_timeout_secs: lookup("DEPOT_CONNECT_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue("DEPOT_CONNECT_TIMEOUT_SECS".to_string()))?,
        })
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Platform data directory for the store.
///
/// - **macOS**: `~/Library/Application Support/com.depot.depot/depot.db`
/// - **Windows**: `%APPDATA%\depot\depot\data\depot.db`
/// - **Linux**: `~/.local/share/depot/depot.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "depot", "depot")
        .ok_or_else(|| ConfigError::MissingRequired("DEPOT_DB_PATH".to_string()))?;

    let data_dir = dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("depot.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Cannot create data directory {0}")]
    DataDir(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_explicit_values() {
        let config = AppConfig::load_from(None, lookup(&[
            ("DEPOT_DB_PATH", "/tmp/x.db"),
            ("DEPOT_MAX_CONNECTIONS", "2"),
            ("DEPOT_CONNECT_TIMEOUT_SECS", "9"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connect_timeout_secs, 9);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from(None, lookup(&[("DEPOT_DB_PATH", "/tmp/x.db")])).unwrap();
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.connect_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::load_from(None, lookup(&[
            ("DEPOT_DB_PATH", "/tmp/x.db"),
            ("DEPOT_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "DEPOT_MAX_CONNECTIONS"));

        let err = AppConfig::load_from(None, lookup(&[
            ("DEPOT_DB_PATH", "/tmp/x.db"),
            ("DEPOT_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = AppConfig::load_from(None, lookup(&[
            ("DEPOT_DB_PATH", "/tmp/x.db"),
            ("DEPOT_CONNECT_TIMEOUT_SECS", "-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref k) if k == "DEPOT_CONNECT_TIMEOUT_SECS"));
    }

    #[test]
    fn test_flag_overrides_env() {
        let config = AppConfig::load_from(
            Some(PathBuf::from("/tmp/y.db")),
            lookup(&[("DEPOT_DB_PATH", "/tmp/x.db")]),
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/y.db"));
    }
}
