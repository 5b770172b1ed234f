//! Client error types
//!
//! Every remote call collapses into [`ApiError`], which only distinguishes a
//! transport failure from an error the server reported. Its `Display` is the
//! raw message so it can be shown to the user verbatim.

use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a failed remote call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a usable response
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub(crate) fn network(err: impl std::fmt::Display) -> Self {
        ApiError::Network(err.to_string())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The server answered and refused the credentials
    pub fn rejects_credentials(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

/// Result type alias for remote calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Token persistence errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unable to determine a data directory for the session file")]
    NoDataDir,

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode session file")]
    Encode(#[source] serde_json::Error),
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL '{value}'")]
    InvalidApiUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API URL '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("failed to read config file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from flows that touch both the network and local storage
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A view action rejected before any request went out
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Invalid(#[from] imgpress_model::ModelError),

    #[error("image {0} is not loaded")]
    NotLoaded(imgpress_model::ImageId),
}
