//! Explicit application context passed to every view handler

use std::sync::Arc;

use imgpress_model::prelude::{Token, User};
use tracing::{info, warn};

use crate::error::ClientError;
use crate::service::ImageService;
use crate::session::Session;
use crate::token_storage::TokenStorage;

/// Everything a handler needs: the remote service, the token store and the
/// session it mutates
#[derive(Debug)]
pub struct AppContext {
    pub service: Arc<dyn ImageService>,
    pub storage: Arc<dyn TokenStorage>,
    pub session: Session,
}

impl AppContext {
    pub fn new(
        service: Arc<dyn ImageService>,
        storage: Arc<dyn TokenStorage>,
    ) -> Self {
        Self {
            service,
            storage,
            session: Session::new(),
        }
    }

    /// The persisted token, read fresh on every call.
    ///
    /// An unreadable store is treated as signed out.
    pub async fn token(&self) -> Option<Token> {
        match self.storage.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!("[Session] Failed to read persisted token: {}", e);
                None
            }
        }
    }

    /// Validate the persisted token at startup.
    ///
    /// A token the server refuses (401 or 403) is removed. Any other failure,
    /// including an unreachable server, keeps it for the next attempt. Either
    /// way the user stays signed out. Returns whether a user is now signed in.
    pub async fn restore(&mut self) -> bool {
        let Some(token) = self.token().await else {
            return false;
        };

        self.session.set_loading(true);
        let result = self.service.fetch_user(&token).await;
        self.session.set_loading(false);

        match result {
            Ok(user) => {
                info!("[Session] Restored session for {}", user.username);
                self.session.set_user(Some(user));
                true
            }
            Err(e) if e.rejects_credentials() => {
                warn!("[Session] Persisted token rejected: {}", e);
                self.forget_token().await;
                self.session.set_user(None);
                false
            }
            Err(e) => {
                warn!("[Session] Could not validate persisted token: {}", e);
                self.session.set_user(None);
                false
            }
        }
    }

    /// Exchange credentials for a token, persist it and load the profile
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let token = self.service.fetch_token(username, password).await?;
        self.storage.save(&token).await?;

        match self.service.fetch_user(&token).await {
            Ok(user) => {
                info!("[Session] Signed in as {}", user.username);
                self.session.set_user(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                self.forget_token().await;
                self.session.set_user(None);
                Err(e.into())
            }
        }
    }

    /// Drop the persisted token and the user
    pub async fn logout(&mut self) {
        self.forget_token().await;
        self.session.reset();
        info!("[Session] Signed out");
    }

    async fn forget_token(&self) {
        if let Err(e) = self.storage.clear().await {
            warn!("[Session] Failed to clear persisted token: {}", e);
        }
    }
}
