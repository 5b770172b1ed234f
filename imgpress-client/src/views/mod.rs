//! Page views as explicit state machines
//!
//! Each view follows `Idle -> Loading -> Ready | Error`, with the error also
//! surfaced as a session toast. Views own their local collection mirrors and
//! receive the [`crate::AppContext`] on every call; nothing here renders.

pub mod home;
pub mod image_detail;
pub mod login;

pub use home::HomeView;
pub use image_detail::ImageDetailView;
pub use login::LoginView;

use std::future::Future;

use crate::error::ApiResult;
use crate::session::Session;

/// Request lifecycle of a view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Error(String),
    Ready(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    /// A request went out
    pub fn begin(self) -> Self {
        ViewState::Loading
    }

    pub fn succeed(self, data: T) -> Self {
        ViewState::Ready(data)
    }

    pub fn fail(self, message: impl Into<String>) -> Self {
        ViewState::Error(message.into())
    }

    /// The error toast window passed; ready data stays on screen
    pub fn settle(self) -> Self {
        match self {
            ViewState::Error(_) => ViewState::Idle,
            other => other,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Why a view action made no request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No user or no persisted token
    NotAuthenticated,
    /// A required form field is empty
    MissingInput,
    /// The collection is already at its cap
    LimitReached,
    /// The target is not in the local collection or not loaded yet
    NotFound,
}

/// Result of a view action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    Skipped(SkipReason),
    /// The error message, already shown as a toast
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            _ => None,
        }
    }
}

/// Await one remote call with the session's loading flag raised around it
pub(crate) async fn with_loading<T, F>(
    session: &mut Session,
    call: F,
) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    session.set_loading(true);
    let result = call.await;
    session.set_loading(false);
    result
}
