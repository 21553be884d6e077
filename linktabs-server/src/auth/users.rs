use crate::auth::{AuthError, AuthGate, AuthState};
use axum_login::{AuthUser, AuthnBackend, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// There is a single administrator; every authenticated session is this user.
pub const ADMIN_USER_ID: &str = "admin";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
}

impl User {
    pub fn admin() -> Self {
        Self {
            id: ADMIN_USER_ID.to_string(),
        }
    }
}

impl AuthUser for User {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    fn session_auth_hash(&self) -> &[u8] {
        self.id.as_bytes()
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

/// Session authentication backed by the [`AuthGate`].
#[derive(Debug, Clone)]
pub struct Backend {
    gate: Arc<AuthGate>,
}

impl Backend {
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}

impl AuthnBackend for Backend {
    type User = User;
    type Credentials = Credentials;
    type Error = AuthError;

    #[instrument(level = "debug", skip_all, err)]
    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        tracing::debug!("Authenticating admin");
        match self.gate.submit(AuthState::Anonymous, &creds.password) {
            Ok(_) => {
                tracing::debug!("Admin authenticated");
                Ok(Some(User::admin()))
            }
            Err(AuthError::InvalidPassword) => {
                tracing::debug!("Password mismatch");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    #[instrument(level = "trace", skip(self), err)]
    async fn get_user(&self, user_id: &UserId<Self>) -> Result<Option<Self::User>, Self::Error> {
        tracing::trace!(?user_id, "Getting user");
        if self.gate.is_configured() && user_id == ADMIN_USER_ID {
            Ok(Some(User::admin()))
        } else {
            Ok(None)
        }
    }
}

pub type AuthSession = axum_login::AuthSession<Backend>;

/// The authentication state of the session behind `auth_session`.
pub fn auth_state(auth_session: &AuthSession) -> AuthState {
    if auth_session.user.is_some() {
        AuthState::Authenticated
    } else {
        AuthState::Anonymous
    }
}
