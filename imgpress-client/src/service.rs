//! Service trait over the compression API
//!
//! Views talk to the backend through [`ImageService`] so they can be driven by
//! [`crate::ApiClient`] in production and by an in-memory fake in tests.

use async_trait::async_trait;
use imgpress_model::prelude::{
    CompressionId, ImageCompression, ImageId, NewCompression, Token, User,
    UserImage,
};

use crate::error::ApiResult;
use crate::upload::PendingUpload;

#[async_trait]
pub trait ImageService: Send + Sync + std::fmt::Debug {
    /// Exchange credentials for a bearer token
    async fn fetch_token(
        &self,
        username: &str,
        password: &str,
    ) -> ApiResult<Token>;

    /// Profile of the token's owner
    async fn fetch_user(&self, token: &Token) -> ApiResult<User>;

    /// All images of the current user
    async fn fetch_images(&self, token: &Token) -> ApiResult<Vec<UserImage>>;

    /// Upload a file under a display name
    async fn upload_image(
        &self,
        upload: &PendingUpload,
        file_name: &str,
        token: &Token,
    ) -> ApiResult<UserImage>;

    async fn fetch_image(
        &self,
        image_id: &ImageId,
        token: &Token,
    ) -> ApiResult<UserImage>;

    async fn delete_image(
        &self,
        image_id: &ImageId,
        token: &Token,
    ) -> ApiResult<()>;

    async fn fetch_image_compressions(
        &self,
        image_id: &ImageId,
        token: &Token,
    ) -> ApiResult<Vec<ImageCompression>>;

    /// Request a new compression of an image
    async fn add_compression(
        &self,
        request: &NewCompression,
        token: &Token,
    ) -> ApiResult<ImageCompression>;

    async fn delete_compression(
        &self,
        image_id: &ImageId,
        compression_id: &CompressionId,
        token: &Token,
    ) -> ApiResult<()>;

    /// Download the bytes behind a signed URL
    async fn fetch_asset(&self, signed_url: &str) -> ApiResult<Vec<u8>>;
}
