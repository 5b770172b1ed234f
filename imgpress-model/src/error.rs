use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidTimestamp(String),
    InvalidQuality(u8),
    InvalidResizeWidth { requested: u32, max: Option<u32> },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidTimestamp(raw) => {
                write!(f, "invalid timestamp: {raw}")
            }
            ModelError::InvalidQuality(q) => {
                write!(f, "quality must be between 1 and 100, got {q}")
            }
            ModelError::InvalidResizeWidth {
                requested,
                max: Some(max),
            } => write!(
                f,
                "resize width must be between 1 and {max}, got {requested}"
            ),
            ModelError::InvalidResizeWidth { requested, max: None } => {
                write!(f, "resize width must be positive, got {requested}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
