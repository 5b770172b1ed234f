use imgpress_model::prelude::{Toast, User};
use tracing::debug;

use super::{Outcome, SkipReason, ViewState};
use crate::context::AppContext;

/// Credentials form
#[derive(Debug, Default)]
pub struct LoginView {
    pub username: String,
    pub password: String,
    state: ViewState<User>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            state: ViewState::Idle,
        }
    }

    pub fn state(&self) -> &ViewState<User> {
        &self.state
    }

    pub fn can_submit(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }

    /// Exchange the credentials for a token, persist it and load the profile
    pub async fn submit(&mut self, ctx: &mut AppContext) -> Outcome<User> {
        if !self.can_submit() {
            return Outcome::Skipped(SkipReason::MissingInput);
        }

        debug!("[Login] Submitting credentials for {}", self.username.trim());
        self.state = std::mem::take(&mut self.state).begin();
        ctx.session.set_loading(true);
        let result =
            ctx.authenticate(self.username.trim(), &self.password).await;
        ctx.session.set_loading(false);

        match result {
            Ok(user) => {
                self.password.clear();
                self.state =
                    std::mem::take(&mut self.state).succeed(user.clone());
                Outcome::Done(user)
            }
            Err(e) => {
                let message = e.to_string();
                ctx.session.show_toast(Toast::error(message.clone()));
                self.state =
                    std::mem::take(&mut self.state).fail(message.clone());
                Outcome::Failed(message)
            }
        }
    }
}
