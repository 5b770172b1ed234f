//! Local persistence for the bearer token
//!
//! The token is kept under a single well-known key in a small JSON key-value
//! file, the terminal counterpart of browser local storage. There is no
//! expiry logic here: a token is dropped only when the session clears it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::ProjectDirs;
use imgpress_model::Token;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::StorageError;

/// Key the bearer token is stored under
pub const TOKEN_STORAGE_KEY: &str = "imgpress_token";

pub(crate) const TOKEN_FILE: &str = "session.json";

#[async_trait]
pub trait TokenStorage: Send + Sync + std::fmt::Debug {
    /// Read the persisted token, if any
    async fn load(&self) -> Result<Option<Token>, StorageError>;

    /// Persist `token`, replacing any previous one
    async fn save(&self, token: &Token) -> Result<(), StorageError>;

    /// Forget the persisted token. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Token storage backed by a JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Storage in the platform data directory
    pub fn new() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("", "imgpress", "imgpress")
            .ok_or(StorageError::NoDataDir)?;
        Ok(Self::with_path(dirs.data_dir().join(TOKEN_FILE)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(
        &self,
    ) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "[TokenStorage] Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    async fn write_entries(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(StorageError::Encode)?;
        tokio::fs::write(&self.path, json).await.map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = tokio::fs::metadata(&self.path)
                .await
                .map_err(write_err)?
                .permissions();
            perms.set_mode(0o600);
            tokio::fs::set_permissions(&self.path, perms)
                .await
                .map_err(write_err)?;
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<Token>, StorageError> {
        let entries = self.read_entries().await?;
        Ok(entries
            .get(TOKEN_STORAGE_KEY)
            .filter(|token| !token.is_empty())
            .map(Token::bearer))
    }

    async fn save(&self, token: &Token) -> Result<(), StorageError> {
        let mut entries = self.read_entries().await?;
        entries.insert(
            TOKEN_STORAGE_KEY.to_string(),
            token.access_token.clone(),
        );
        self.write_entries(&entries).await?;
        debug!("[TokenStorage] Token saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self.read_entries().await?;
        if entries.remove(TOKEN_STORAGE_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await?;
        debug!("[TokenStorage] Token cleared from {}", self.path.display());
        Ok(())
    }
}

/// In-memory token storage, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<Token>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<Token>, StorageError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, token: &Token) -> Result<(), StorageError> {
        *self.slot.lock().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
