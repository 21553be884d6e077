pub mod users;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Admin password is not configured")]
    NotConfigured,
    #[error("Incorrect password")]
    InvalidPassword,
}

/// Per-session authentication state. A new session always starts
/// [`AuthState::Anonymous`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Password gate in front of the admin editor.
///
/// The secret is fixed for the lifetime of the gate. Without a secret the
/// gate is "not configured" and denies every attempt.
#[derive(Clone, Default)]
pub struct AuthGate {
    secret: Option<String>,
}

impl AuthGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|secret| !secret.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Exact, case-sensitive comparison without trimming.
    pub fn verify(&self, typed: &str) -> Result<(), AuthError> {
        match &self.secret {
            None => Err(AuthError::NotConfigured),
            Some(secret) if secret == typed => Ok(()),
            Some(_) => Err(AuthError::InvalidPassword),
        }
    }

    /// Transition for a submitted password. On error the caller keeps its
    /// current state.
    pub fn submit(&self, state: AuthState, typed: &str) -> Result<AuthState, AuthError> {
        if !self.is_configured() {
            return Err(AuthError::NotConfigured);
        }
        if state.is_authenticated() {
            return Ok(state);
        }
        self.verify(typed).map(|()| AuthState::Authenticated)
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("configured", &self.is_configured())
            .finish()
    }
}
