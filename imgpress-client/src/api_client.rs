use async_trait::async_trait;
use imgpress_model::prelude::{
    CompressionId, ImageCompression, ImageId, NewCompression, Token, User,
    UserImage,
};
use reqwest::{Client, RequestBuilder, StatusCode, multipart};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::routes;
use crate::service::ImageService;
use crate::upload::PendingUpload;

/// REST client for the compression service
///
/// Every call is a single round trip. There is no timeout, retry or backoff;
/// failures are returned to the caller once.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder().build().map_err(ApiError::network)?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("[ApiClient] Creating API client with base URL: {}", base_url);
        Self { client, base_url }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an absolute URL for a route or a server-relative path
    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    /// URL at which a signed asset can be fetched or displayed
    pub fn asset_url(&self, signed_url: &str) -> String {
        self.build_url(signed_url)
    }

    fn authenticated(
        &self,
        builder: RequestBuilder,
        token: &Token,
    ) -> RequestBuilder {
        builder.header("Authorization", token.authorization())
    }

    /// Send a request and unwrap the JSON body or the server's error message
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(|e| {
            warn!("[ApiClient] Failed to decode response body: {}", e);
            ApiError::network(e)
        })
    }

    /// Like [`Self::execute`] but ignores whatever confirmation body is sent
    async fn execute_unit(&self, request: RequestBuilder) -> ApiResult<()> {
        let response = self.send(request).await?;
        response.bytes().await.map_err(ApiError::network)?;
        Ok(())
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            warn!("[ApiClient] Request failed: {}", e);
            ApiError::network(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = server_error_message(status, &body);
        warn!(
            "[ApiClient] Server returned {}: {}",
            status.as_u16(),
            message
        );
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &Token,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        debug!("GET request to: {}", url);
        let request = self.authenticated(self.client.get(&url), token);
        self.execute(request).await
    }

    async fn delete(&self, path: &str, token: &Token) -> ApiResult<()> {
        let url = self.build_url(path);
        debug!("DELETE request to: {}", url);
        let request = self.authenticated(self.client.delete(&url), token);
        self.execute_unit(request).await
    }

    async fn put_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: multipart::Form,
        token: &Token,
    ) -> ApiResult<T> {
        let url = self.build_url(path);
        debug!("PUT (multipart) request to: {}", url);
        let request =
            self.authenticated(self.client.put(&url).multipart(form), token);
        self.execute(request).await
    }
}

/// Pick the user-facing message out of an error response body.
///
/// FastAPI reports `{"detail": "..."}`, or a list of `{"msg": ...}` entries
/// for validation failures. A plain `message` field is accepted as well.
pub fn server_error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let from_body = parsed.as_ref().and_then(|value| {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => Some(detail.clone()),
            Some(serde_json::Value::Array(entries)) => entries
                .first()
                .and_then(|entry| entry.get("msg"))
                .and_then(|msg| msg.as_str())
                .map(str::to_string),
            _ => None,
        }
        .or_else(|| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
    });

    from_body.unwrap_or_else(|| {
        format!("Request failed with status {}", status.as_u16())
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UploadResponse {
    Wrapped { file: UserImage },
    Bare(UserImage),
}

impl UploadResponse {
    fn into_image(self) -> UserImage {
        match self {
            UploadResponse::Wrapped { file } => file,
            UploadResponse::Bare(image) => image,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompressionResponse {
    Wrapped { compression: ImageCompression },
    Bare(ImageCompression),
}

impl CompressionResponse {
    fn into_compression(self) -> ImageCompression {
        match self {
            CompressionResponse::Wrapped { compression } => compression,
            CompressionResponse::Bare(compression) => compression,
        }
    }
}

#[async_trait]
impl ImageService for ApiClient {
    async fn fetch_token(
        &self,
        username: &str,
        password: &str,
    ) -> ApiResult<Token> {
        let url = self.build_url(routes::auth::TOKEN);
        debug!("POST (form) request to: {}", url);
        let request = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)]);
        self.execute(request).await
    }

    async fn fetch_user(&self, token: &Token) -> ApiResult<User> {
        self.get(routes::auth::ME, token).await
    }

    async fn fetch_images(&self, token: &Token) -> ApiResult<Vec<UserImage>> {
        self.get(routes::images::LIST, token).await
    }

    async fn upload_image(
        &self,
        upload: &PendingUpload,
        file_name: &str,
        token: &Token,
    ) -> ApiResult<UserImage> {
        let part = multipart::Part::bytes(upload.bytes().to_vec())
            .file_name(upload.original_name().to_string())
            .mime_str(upload.mime_type())
            .map_err(ApiError::network)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("file_name", file_name.to_string());

        let created: UploadResponse = self
            .put_multipart(routes::images::UPLOAD, form, token)
            .await?;
        Ok(created.into_image())
    }

    async fn fetch_image(
        &self,
        image_id: &ImageId,
        token: &Token,
    ) -> ApiResult<UserImage> {
        self.get(&routes::images::image(image_id), token).await
    }

    async fn delete_image(
        &self,
        image_id: &ImageId,
        token: &Token,
    ) -> ApiResult<()> {
        self.delete(&routes::images::image(image_id), token).await
    }

    async fn fetch_image_compressions(
        &self,
        image_id: &ImageId,
        token: &Token,
    ) -> ApiResult<Vec<ImageCompression>> {
        self.get(&routes::images::compressions(image_id), token).await
    }

    async fn add_compression(
        &self,
        request: &NewCompression,
        token: &Token,
    ) -> ApiResult<ImageCompression> {
        let form = multipart::Form::new()
            .text("image_id", request.image_id.to_string())
            .text("quality", request.quality.to_string())
            .text("resize_width", request.resize_width.to_string());

        let created: CompressionResponse = self
            .put_multipart(
                &routes::images::new_compression(&request.image_id),
                form,
                token,
            )
            .await?;
        Ok(created.into_compression())
    }

    async fn delete_compression(
        &self,
        image_id: &ImageId,
        compression_id: &CompressionId,
        token: &Token,
    ) -> ApiResult<()> {
        self.delete(
            &routes::images::compression(image_id, compression_id),
            token,
        )
        .await
    }

    async fn fetch_asset(&self, signed_url: &str) -> ApiResult<Vec<u8>> {
        let url = self.asset_url(signed_url);
        debug!("GET (bytes) request to: {}", url);
        let request = self
            .client
            .get(&url)
            .header("Accept", "image/*;q=0.9,*/*;q=0.8");
        let response = self.send(request).await?;
        let bytes = response.bytes().await.map_err(ApiError::network)?;
        Ok(bytes.to_vec())
    }
}
