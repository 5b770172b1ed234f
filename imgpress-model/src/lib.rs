//! Core data model definitions shared across imgpress crates.

pub use ::chrono;

pub mod compression;
pub mod error;
pub mod ids;
pub mod image;
pub mod limits;
pub mod prelude;
#[cfg(feature = "serde")]
mod serde_util;
pub mod timestamp;
pub mod toast;
pub mod user;

pub use compression::{ImageCompression, NewCompression};
pub use error::{ModelError, Result as ModelResult};
pub use ids::{CompressionId, ImageId};
pub use image::{ImageFormatKind, UserImage};
pub use limits::{
    DEFAULT_JPEG_QUALITY, MAX_COMPRESSIONS_PER_IMAGE, MAX_USER_IMAGES,
    TOAST_DURATION,
};
pub use toast::{Toast, ToastKind};
pub use user::{Token, User};
