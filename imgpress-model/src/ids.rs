//! Server-assigned identifiers.
//!
//! The backend hands out opaque string ids (uuid text in practice). They are
//! wrapped so an image id can never be passed where a compression id is
//! expected.

use std::fmt;

/// Identifier of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        ImageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageId {
    fn from(value: &str) -> Self {
        ImageId(value.to_string())
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        ImageId(value)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a compression derived from an image
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CompressionId(pub String);

impl CompressionId {
    pub fn new(id: impl Into<String>) -> Self {
        CompressionId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CompressionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CompressionId {
    fn from(value: &str) -> Self {
        CompressionId(value.to_string())
    }
}

impl From<String> for CompressionId {
    fn from(value: String) -> Self {
        CompressionId(value)
    }
}

impl fmt::Display for CompressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
