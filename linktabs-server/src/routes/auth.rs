use crate::auth::users::{AuthSession, Credentials};
use crate::auth::AuthError;
use crate::http::error::AppError;
use crate::http::RedirectResult;
use crate::metrics::{AuthMetrics, LoginOutcome};
use crate::session::SessionState;
use crate::state::AppState;
use anyhow::Context;
use axum::response::Redirect;
use axum::routing::post;
use axum::{Form, Router};
use std::sync::Arc;
use tower_sessions::Session;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(post::login))
        .route("/clear", post(post::clear))
        .route("/logout", post(post::logout))
}

mod post {
    use super::*;
    use linktabs_protocol::http::auth::LoginForm;
    use tracing::instrument;

    #[instrument(level = "info", skip_all)]
    pub async fn login(
        mut auth_session: AuthSession,
        session: Session,
        Form(LoginForm { password }): Form<LoginForm>,
    ) -> RedirectResult {
        if auth_session.user.is_some() {
            tracing::debug!("Session already authenticated");
            return Ok(Redirect::to("/"));
        }

        let creds = Credentials { password };
        let user = match auth_session.authenticate(creds).await {
            Ok(Some(user)) => user,
            Ok(None) => return login_failed(&session, AuthError::InvalidPassword).await,
            Err(axum_login::Error::Backend(err)) => return login_failed(&session, err).await,
            Err(err) => {
                return Err(AppError::InternalServerError(
                    anyhow::Error::new(err).context("Failed to authenticate admin"),
                ));
            }
        };

        auth_session
            .login(&user)
            .await
            .context("Failed to login user")?;

        tracing::info!("Admin logged in");
        AuthMetrics::login_attempt(LoginOutcome::Success);

        let mut state = SessionState::admin();
        state.flash_success("Access granted.");
        state.store(&session).await?;
        Ok(Redirect::to("/"))
    }

    async fn login_failed(session: &Session, err: AuthError) -> RedirectResult {
        tracing::info!(?err, "Admin login failed");
        AuthMetrics::login_attempt(LoginOutcome::Failure(err));

        let mut state = SessionState::load(session).await?;
        state.flash_error(err.to_string());
        state.store(session).await?;
        Ok(Redirect::to("/"))
    }

    /// The "clear" button of the login form.
    pub async fn clear(mut auth_session: AuthSession) -> RedirectResult {
        auth_session
            .logout()
            .await
            .context("Failed to clear session")?;
        Ok(Redirect::to("/"))
    }

    #[instrument(level = "info", skip_all)]
    pub async fn logout(mut auth_session: AuthSession) -> RedirectResult {
        if auth_session
            .logout()
            .await
            .context("Failed to logout user")?
            .is_some()
        {
            tracing::info!("Admin logged out");
        }
        Ok(Redirect::to("/"))
    }
}
