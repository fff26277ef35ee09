//! Configuration loading.
//!
//! Settings come from `~/.config/boiling/config.toml` (or an explicit path),
//! then environment and command-line overrides are applied by the caller.
//!
//! ```toml
//! database_url = "postgres://boiling@localhost/boiling"
//! max_connections = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BoilingError, BoilingResult};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl Config {
    /// `<config dir>/boiling/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("boiling").join("config.toml"))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`.
    ///
    /// An explicit path must exist; a missing default file yields the
    /// defaults.
    pub fn load(path: Option<&Path>) -> BoilingResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> BoilingResult<Self> {
        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text).map_err(|e| match e {
            BoilingError::Config(msg) => {
                BoilingError::Config(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn from_toml(text: &str) -> BoilingResult<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| BoilingError::Config(e.to_string()))?;
        if config.max_connections == 0 {
            return Err(BoilingError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Override the database URL when one is given.
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.database_url = url;
        }
        self
    }

    pub fn require_database_url(&self) -> BoilingResult<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            BoilingError::Config(
                "no database URL; use --database-url, BOILING_DATABASE_URL or the config file"
                    .to_string(),
            )
        })
    }
}
