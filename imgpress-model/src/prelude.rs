//! Client focused snapshot of the types surface.
//! Prefer importing from this module in front ends over reaching into
//! individual tree nodes.

pub use super::compression::{ImageCompression, NewCompression};
pub use super::ids::{CompressionId, ImageId};
pub use super::image::{ImageFormatKind, UserImage};
pub use super::limits::{
    DEFAULT_JPEG_QUALITY, MAX_COMPRESSIONS_PER_IMAGE, MAX_USER_IMAGES,
    TOAST_DURATION,
};
pub use super::timestamp::{display_server_timestamp, parse_server_timestamp};
pub use super::toast::{Toast, ToastKind};
pub use super::user::{Token, User};
