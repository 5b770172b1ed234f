//! API route constants for the compression service
//!
//! Paths are relative to the configured API base URL.

/// Authentication endpoints
pub mod auth {
    /// Exchange form-encoded credentials for a bearer token
    pub const TOKEN: &str = "/token";
    /// Current user profile
    pub const ME: &str = "/user/me";
}

/// Image endpoints
pub mod images {
    use imgpress_model::{CompressionId, ImageId};

    /// List the user's images
    pub const LIST: &str = "/images";
    /// Upload a new image (multipart `file` + `file_name`)
    pub const UPLOAD: &str = "/image";

    /// Single image (GET / DELETE)
    pub fn image(id: &ImageId) -> String {
        format!("/image/{id}")
    }

    /// Compressions of one image
    pub fn compressions(id: &ImageId) -> String {
        format!("/image/{id}/image-compressions")
    }

    /// Create a compression (multipart `image_id`, `quality`, `resize_width`)
    pub fn new_compression(id: &ImageId) -> String {
        format!("/image/{id}/image-compression")
    }

    /// Delete one compression
    pub fn compression(id: &ImageId, compression_id: &CompressionId) -> String {
        format!("/image/{id}/image-compression/{compression_id}")
    }
}
