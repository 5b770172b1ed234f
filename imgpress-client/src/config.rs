//! Client configuration
//!
//! Values come from an optional TOML file named by `IMGPRESS_CONFIG`, then
//! from the environment (a `.env` file is honoured), with environment values
//! taking precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::ConfigError;
use crate::token_storage::FileTokenStorage;

pub const ENV_API_URL: &str = "IMGPRESS_API_URL";
pub const ENV_TOKEN_FILE: &str = "IMGPRESS_TOKEN_FILE";
pub const ENV_CONFIG_FILE: &str = "IMGPRESS_CONFIG";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the compression service, without a trailing slash
    pub api_url: String,
    /// Where the bearer token is persisted; platform data dir when unset
    pub token_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_file: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    token_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Load from `.env`, the process environment and the optional config file
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_path =
            lookup(ENV_CONFIG_FILE).filter(|v| !v.trim().is_empty());
        let file = match file_path {
            Some(path) => Self::read_file(Path::new(&path))?,
            None => FileConfig::default(),
        };

        let api_url = lookup(ENV_API_URL)
            .filter(|v| !v.trim().is_empty())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token_file = lookup(ENV_TOKEN_FILE)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or(file.token_file);

        Ok(Self {
            api_url: normalize_api_url(&api_url)?,
            token_file,
        })
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Token storage at the configured location
    pub fn token_storage(&self) -> Result<FileTokenStorage, ConfigError> {
        match &self.token_file {
            Some(path) => Ok(FileTokenStorage::with_path(path)),
            None => Ok(FileTokenStorage::new()?),
        }
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidApiUrl {
        value: trimmed.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
