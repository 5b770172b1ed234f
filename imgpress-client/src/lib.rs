//! Client side of the imgpress image compression service.
//!
//! The backend owns every image and compression. This crate calls it over
//! REST ([`api_client`]), keeps optimistic local mirrors of its collections
//! ([`store`]), tracks the signed-in user, loading flag and toast
//! ([`session`]), and models the Login, Home and Image pages as explicit state
//! machines ([`views`]) so any front end can drive them.

pub mod api_client;
pub mod asset;
pub mod config;
pub mod context;
pub mod error;
pub mod routes;
pub mod service;
pub mod session;
pub mod store;
pub mod token_storage;
pub mod upload;
pub mod views;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use context::AppContext;
pub use error::{
    ApiError, ApiResult, ClientError, ConfigError, StorageError, ViewError,
};
pub use service::ImageService;
pub use session::{Session, SessionEvent, ToastSlot};
pub use store::{CollectionStore, Keyed};
pub use token_storage::{
    FileTokenStorage, MemoryTokenStorage, TOKEN_STORAGE_KEY, TokenStorage,
};
pub use upload::{FileDetails, PendingUpload};
pub use views::{
    HomeView, ImageDetailView, LoginView, Outcome, SkipReason, ViewState,
};

pub use imgpress_model as model;
