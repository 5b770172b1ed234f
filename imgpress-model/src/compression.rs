use chrono::{DateTime, Utc};

use crate::error::{ModelError, Result};
use crate::ids::{CompressionId, ImageId};
use crate::limits::DEFAULT_JPEG_QUALITY;
use crate::timestamp::parse_server_timestamp;

/// A compressed variant of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageCompression {
    pub id: CompressionId,
    pub image_id: ImageId,
    pub path: String,
    pub quality: u8,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub resize_width: u32,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub size: u64,
    pub created_at: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "crate::serde_util::null_as_default")
    )]
    pub signed_url: String,
}

impl ImageCompression {
    pub fn created_at_utc(&self) -> Result<DateTime<Utc>> {
        parse_server_timestamp(&self.created_at)
    }

    pub fn belongs_to(&self, image_id: &ImageId) -> bool {
        &self.image_id == image_id
    }
}

/// Parameters of a compression request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompression {
    pub image_id: ImageId,
    pub quality: u8,
    pub resize_width: u32,
}

impl NewCompression {
    /// Build a request for `image_id`.
    ///
    /// `quality` is only honoured when `supports_quality` is set, otherwise the
    /// default is sent. `natural_width` bounds `resize_width` when known.
    pub fn validated(
        image_id: ImageId,
        quality: Option<u8>,
        resize_width: u32,
        supports_quality: bool,
        natural_width: Option<u32>,
    ) -> Result<Self> {
        let quality = match quality {
            Some(q) if supports_quality => {
                if !(1..=100).contains(&q) {
                    return Err(ModelError::InvalidQuality(q));
                }
                q
            }
            _ => DEFAULT_JPEG_QUALITY,
        };

        let width_ok = match natural_width {
            Some(max) => (1..=max).contains(&resize_width),
            None => resize_width >= 1,
        };
        if !width_ok {
            return Err(ModelError::InvalidResizeWidth {
                requested: resize_width,
                max: natural_width,
            });
        }

        Ok(Self {
            image_id,
            quality,
            resize_width,
        })
    }
}
