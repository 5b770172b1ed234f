use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::ids::ImageId;
use crate::timestamp::parse_server_timestamp;

/// An image uploaded by the current user
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserImage {
    pub id: ImageId,
    pub user_id: String,
    pub path: String,
    pub name: String,
    pub extension: String,
    pub size: u64,
    pub uploaded_at: String,
    /// Maintained by the server; the client never adjusts it.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub num_compressions: u32,
    /// Path relative to the API base URL, empty when the server did not
    /// sign one.
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub signed_url: String,
}

impl UserImage {
    pub fn format(&self) -> ImageFormatKind {
        ImageFormatKind::from_extension(&self.extension)
    }

    /// Whether a quality setting changes anything for this image.
    pub fn supports_quality(&self) -> bool {
        self.format() == ImageFormatKind::Jpeg
    }

    pub fn uploaded_at_utc(&self) -> Result<DateTime<Utc>> {
        parse_server_timestamp(&self.uploaded_at)
    }

    pub fn has_signed_url(&self) -> bool {
        !self.signed_url.is_empty()
    }

    /// "This image has 1 compression" / "This image has 3 compressions"
    pub fn compressions_label(&self) -> String {
        let plural = if self.num_compressions == 1 { "" } else { "s" };
        format!(
            "This image has {} compression{plural}",
            self.num_compressions
        )
    }
}

/// Image formats the backend knows how to compress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormatKind {
    Jpeg,
    Png,
    Gif,
    Other,
}

impl ImageFormatKind {
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.');
        if ext.eq_ignore_ascii_case("jpeg") || ext.eq_ignore_ascii_case("jpg")
        {
            ImageFormatKind::Jpeg
        } else if ext.eq_ignore_ascii_case("png") {
            ImageFormatKind::Png
        } else if ext.eq_ignore_ascii_case("gif") {
            ImageFormatKind::Gif
        } else {
            ImageFormatKind::Other
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormatKind::Jpeg => "image/jpeg",
            ImageFormatKind::Png => "image/png",
            ImageFormatKind::Gif => "image/gif",
            ImageFormatKind::Other => "application/octet-stream",
        }
    }
}
