use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = ".git-coin.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoinConfig {
    /// git executable used for every repository command.
    pub git_binary: PathBuf,
    /// Let `give` overdraw without `--force`.
    pub allow_overdraft: bool,
    pub table_padding: usize,
    pub table_fill: char,
}

impl Default for CoinConfig {
    fn default() -> Self {
        Self {
            git_binary: PathBuf::from("git"),
            allow_overdraft: false,
            table_padding: 4,
            table_fill: '.',
        }
    }
}

impl CoinConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `explicit` if given, else `.git-coin.toml` in `workdir` when present,
    /// else defaults.
    pub fn discover(explicit: Option<&Path>, workdir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = workdir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
