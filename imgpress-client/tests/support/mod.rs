//! In-process fake of the compression backend
//!
//! Serves the full REST surface from memory on an ephemeral port. One account
//! exists (`alice` / `secret`); every route except `/token` and the asset
//! route requires its bearer token.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use image::{ImageFormat, RgbImage};
use imgpress_client::model::{
    CompressionId, ImageCompression, ImageId, MAX_COMPRESSIONS_PER_IMAGE,
    MAX_USER_IMAGES, UserImage,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";
pub const VALID_TOKEN: &str = "tok-alice";
pub const ASSET_WIDTH: u32 = 48;

/// A file the backend received through `PUT /image`
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub original_name: String,
    pub content_type: String,
    pub file_name: String,
    pub size: usize,
}

/// A compression request the backend received
#[derive(Debug, Clone)]
pub struct ReceivedCompression {
    pub image_id: String,
    pub quality: u8,
    pub resize_width: u32,
}

#[derive(Debug, Default)]
pub struct BackendState {
    pub images: Vec<UserImage>,
    pub compressions: Vec<ImageCompression>,
    pub uploads: Vec<ReceivedUpload>,
    pub compression_requests: Vec<ReceivedCompression>,
    /// Answer every authenticated route with this status and body once set
    pub fail_with: Option<(StatusCode, serde_json::Value)>,
    next_id: u32,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

type Shared = Arc<Mutex<BackendState>>;

/// Handle to a running fake backend; the server stops when it is dropped
#[derive(Debug)]
pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
    server: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));
        let app = Router::new()
            .route("/token", post(issue_token))
            .route("/user/me", get(current_user))
            .route("/images", get(list_images))
            .route("/image", put(upload_image).get(signed_asset))
            .route("/image/{id}", get(get_image).delete(delete_image))
            .route("/image/{id}/image-compressions", get(list_compressions))
            .route("/image/{id}/image-compression", put(add_compression))
            .route(
                "/image/{id}/image-compression/{compression_id}",
                delete(delete_compression),
            )
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            server,
        }
    }

    /// Insert images directly, as if uploaded earlier
    pub fn seed_images(&self, count: usize) -> Vec<ImageId> {
        let mut state = self.state.lock().expect("backend state");
        (0..count)
            .map(|n| {
                let id = state.next_id("img");
                let image = image_fixture(&id, &format!("seed {n}"), "png");
                state.images.push(image);
                ImageId::new(id)
            })
            .collect()
    }

    pub fn seed_compression(&self, image_id: &str) -> CompressionId {
        let mut state = self.state.lock().expect("backend state");
        let id = state.next_id("cmp");
        state
            .compressions
            .push(compression_fixture(&id, image_id, 80, 32));
        CompressionId::new(id)
    }

    pub fn fail_with(&self, status: StatusCode, body: serde_json::Value) {
        self.answer_with(status, body);
    }

    /// Every authorized request gets `body` with `status` from now on
    pub fn answer_with(&self, status: StatusCode, body: serde_json::Value) {
        self.state.lock().expect("backend state").fail_with =
            Some((status, body));
    }

    pub fn image_count(&self) -> usize {
        self.state.lock().expect("backend state").images.len()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.lock().expect("backend state").uploads.clone()
    }

    pub fn compression_requests(&self) -> Vec<ReceivedCompression> {
        self.state
            .lock()
            .expect("backend state")
            .compression_requests
            .clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn image_fixture(id: &str, name: &str, extension: &str) -> UserImage {
    UserImage {
        id: ImageId::new(id),
        user_id: "user-alice".to_string(),
        path: format!("users/alice/{id}.{extension}"),
        name: name.to_string(),
        extension: extension.to_string(),
        size: 1024,
        uploaded_at: "2024-05-01 12:00:00+0000".to_string(),
        num_compressions: 0,
        signed_url: format!("/image?signature={id}"),
    }
}

pub fn compression_fixture(
    id: &str,
    image_id: &str,
    quality: u8,
    resize_width: u32,
) -> ImageCompression {
    ImageCompression {
        id: CompressionId::new(id),
        image_id: ImageId::new(image_id),
        path: format!("users/alice/{image_id}/{id}.jpg"),
        quality,
        resize_width,
        size: 512,
        created_at: "2024-05-01 12:30:00+0000".to_string(),
        signed_url: format!("/image?signature={id}"),
    }
}

/// PNG bytes `width` pixels wide
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    RgbImage::new(width, height)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Bearer check plus the forced failure switch
fn guard(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {VALID_TOKEN}"));
    if !authorized {
        return Err(detail(
            StatusCode::UNAUTHORIZED,
            "Could not validate credentials",
        ));
    }
    let canned = state.lock().expect("backend state").fail_with.clone();
    if let Some((status, body)) = canned {
        return Err((status, Json(body)).into_response());
    }
    Ok(())
}

async fn issue_token(Form(form): Form<HashMap<String, String>>) -> Response {
    let username = form.get("username").map(String::as_str);
    let password = form.get("password").map(String::as_str);
    if username == Some(USERNAME) && password == Some(PASSWORD) {
        Json(json!({ "access_token": VALID_TOKEN, "token_type": "bearer" }))
            .into_response()
    } else {
        detail(StatusCode::UNAUTHORIZED, "Incorrect username or password")
    }
}

async fn current_user(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }
    Json(json!({ "username": USERNAME, "id": "user-alice" })).into_response()
}

async fn list_images(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }
    let images = state.lock().expect("backend state").images.clone();
    Json(images).into_response()
}

async fn upload_image(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }

    let mut file = None;
    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().map(str::to_owned).as_deref() {
            Some("file") => {
                let original_name =
                    field.file_name().unwrap_or_default().to_string();
                let content_type =
                    field.content_type().unwrap_or_default().to_string();
                let Ok(bytes) = field.bytes().await else {
                    return detail(StatusCode::BAD_REQUEST, "Unreadable file");
                };
                file = Some((original_name, content_type, bytes.len()));
            }
            Some("file_name") => file_name = field.text().await.ok(),
            _ => {}
        }
    }

    let (Some((original_name, content_type, size)), Some(file_name)) =
        (file, file_name)
    else {
        return detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "file and file_name are required",
        );
    };

    let mut state = state.lock().expect("backend state");
    if state.images.len() >= MAX_USER_IMAGES {
        return detail(StatusCode::BAD_REQUEST, "Image limit reached");
    }
    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    let id = state.next_id("img");
    let mut image = image_fixture(&id, &file_name, &extension);
    image.size = size as u64;
    state.images.push(image.clone());
    state.uploads.push(ReceivedUpload {
        original_name,
        content_type,
        file_name,
        size,
    });

    Json(json!({ "file": image })).into_response()
}

async fn signed_asset(
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if query.get("signature").is_none_or(|s| s.is_empty()) {
        return detail(StatusCode::FORBIDDEN, "Missing signature");
    }
    (
        [(header::CONTENT_TYPE, "image/png")],
        png_bytes(ASSET_WIDTH, 16),
    )
        .into_response()
}

async fn get_image(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }
    let state = state.lock().expect("backend state");
    match state.images.iter().find(|image| image.id.as_str() == id) {
        Some(image) => {
            let mut image = image.clone();
            image.num_compressions = state
                .compressions
                .iter()
                .filter(|c| c.image_id.as_str() == id)
                .count() as u32;
            Json(image).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "Image not found"),
    }
}

async fn delete_image(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }
    let mut state = state.lock().expect("backend state");
    let before = state.images.len();
    state.images.retain(|image| image.id.as_str() != id);
    if state.images.len() == before {
        return detail(StatusCode::NOT_FOUND, "Image not found");
    }
    state.compressions.retain(|c| c.image_id.as_str() != id);
    Json(json!({ "message": "Image deleted" })).into_response()
}

async fn list_compressions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }
    // Returned unfiltered so clients have to discard foreign entries themselves
    let compressions =
        state.lock().expect("backend state").compressions.clone();
    Json(compressions).into_response()
}

async fn add_compression(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }

    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if let Ok(value) = field.text().await {
            fields.insert(name, value);
        }
    }

    let quality = fields.get("quality").and_then(|v| v.parse::<u8>().ok());
    let resize_width = fields
        .get("resize_width")
        .and_then(|v| v.parse::<u32>().ok());
    let (Some(image_id), Some(quality), Some(resize_width)) =
        (fields.get("image_id").cloned(), quality, resize_width)
    else {
        return detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid compression form",
        );
    };

    let mut state = state.lock().expect("backend state");
    if !state.images.iter().any(|image| image.id.as_str() == id) {
        return detail(StatusCode::NOT_FOUND, "Image not found");
    }
    let existing = state
        .compressions
        .iter()
        .filter(|c| c.image_id.as_str() == id)
        .count();
    if existing >= MAX_COMPRESSIONS_PER_IMAGE {
        return detail(StatusCode::BAD_REQUEST, "Compression limit reached");
    }

    let compression_id = state.next_id("cmp");
    let compression =
        compression_fixture(&compression_id, &id, quality, resize_width);
    state.compressions.push(compression.clone());
    state.compression_requests.push(ReceivedCompression {
        image_id,
        quality,
        resize_width,
    });

    Json(compression).into_response()
}

async fn delete_compression(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((id, compression_id)): Path<(String, String)>,
) -> Response {
    if let Err(response) = guard(&state, &headers) {
        return response;
    }
    let mut state = state.lock().expect("backend state");
    let before = state.compressions.len();
    state.compressions.retain(|c| {
        !(c.image_id.as_str() == id && c.id.as_str() == compression_id)
    });
    if state.compressions.len() == before {
        return detail(StatusCode::NOT_FOUND, "Compression not found");
    }
    Json(json!({ "message": "Compression deleted" })).into_response()
}
