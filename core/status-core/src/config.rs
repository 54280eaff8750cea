//! Configuration loading for status-sync.
//!
//! Lives at `~/.status-sync/config.toml`. A missing file means defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, StatusError};

const DATA_DIR_NAME: &str = ".status-sync";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "state.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusConfig {
    /// SQLite database holding job and notebook records.
    pub database_path: Option<PathBuf>,
    /// Directory for daily-rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl StatusConfig {
    pub fn resolved_database_path(&self) -> Result<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join(DB_FILE_NAME)),
        }
    }
}

/// Returns the status-sync data directory (~/.status-sync).
pub fn data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or_else(|| StatusError::Io {
            context: "Home directory not found".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(CONFIG_FILE_NAME))
}

pub fn load_config(path: Option<&Path>) -> Result<StatusConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !config_path.exists() {
        return Ok(StatusConfig::default());
    }

    let content = fs_err::read_to_string(&config_path).map_err(|source| StatusError::Io {
        context: format!("Failed to read config {}", config_path.display()),
        source,
    })?;
    toml::from_str::<StatusConfig>(&content).map_err(|err| StatusError::ConfigMalformed {
        path: config_path,
        details: err.to_string(),
    })
}
