//! Signed-in user state.

use std::sync::Arc;

use vlab_core::load_state::LoadState;

use crate::api::VlabApi;
use crate::error::ClientError;
use crate::models::User;

pub struct AuthStore {
    api: Arc<dyn VlabApi>,
    user: Option<User>,
    state: LoadState,
}

impl AuthStore {
    pub fn new(api: Arc<dyn VlabApi>) -> Self {
        Self {
            api,
            user: None,
            state: LoadState::Idle,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Store `token` on the client and load the profile it belongs to.
    ///
    /// A rejected token is cleared again so later requests go out
    /// unauthenticated.
    pub async fn sign_in(&mut self, token: impl Into<String>) -> Result<User, ClientError> {
        self.api.set_token(Some(token.into()));
        let result = self.load_user().await;
        if matches!(&result, Err(e) if e.is_unauthorized()) {
            self.api.set_token(None);
            self.user = None;
        }
        result
    }

    /// Reload the profile with the current token.
    pub async fn refresh_user(&mut self) -> Result<User, ClientError> {
        let result = self.load_user().await;
        if matches!(&result, Err(e) if e.is_unauthorized()) {
            self.user = None;
        }
        result
    }

    pub fn sign_out(&mut self) {
        self.api.set_token(None);
        self.user = None;
        self.state = LoadState::Idle;
        tracing::debug!("Signed out");
    }

    async fn load_user(&mut self) -> Result<User, ClientError> {
        self.state.begin();
        let user = self.state.settle(self.api.me().await)?;
        self.user = Some(user.clone());
        Ok(user)
    }
}
