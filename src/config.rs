//! Configuration file handling
//!
//! Settings live in `<config dir>/tracker-core/config.toml`. Every key is
//! optional; a missing file means defaults.
//!
//! ```toml
//! database_path = "/home/me/.local/share/tracker-core/library.db"
//! max_connections = 5
//! busy_timeout_secs = 30
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TrackerError};

const APP_DIR: &str = "tracker-core";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,
    /// Upper bound of the connection pool
    pub max_connections: u32,
    /// How long to wait for a locked database or a free connection
    pub busy_timeout_secs: u64,
    /// Default tracing directive, overridden by `TRACKER_LOG`
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path(),
            max_connections: 5,
            busy_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// `~/.config/tracker-core/config.toml` (platform equivalent elsewhere)
    pub fn default_path() -> PathBuf {
        let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config.join(APP_DIR).join("config.toml")
    }

    /// `~/.local/share/tracker-core/library.db` (platform equivalent elsewhere)
    pub fn default_database_path() -> PathBuf {
        let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data.join(APP_DIR).join("library.db")
    }

    /// Read a config file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(TrackerError::ConfigurationError(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from [`Config::default_path`]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::load(&Self::default_path()),
        }
    }

    /// Write the config atomically (temp file + rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(TrackerError::InvalidConfiguration(
                "max_connections must be at least 1".to_string(),
            ));
        }
        if self.database_path.as_os_str().is_empty() {
            return Err(TrackerError::InvalidConfiguration(
                "database_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
