use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get::index))
}

pub fn untraced_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(get::health))
        .route("/favicon.ico", get(get::favicon))
}

mod get {
    use crate::auth::users::{AuthSession, auth_state};
    use crate::http::HtmlResult;
    use crate::metrics::PageMetrics;
    use crate::render::{ViewRequest, render};
    use crate::session::SessionState;
    use crate::state::AppState;
    use crate::templates;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde::Deserialize;
    use std::sync::Arc;
    use tower_sessions::Session;
    use tracing::instrument;

    #[derive(Debug, Deserialize)]
    pub struct PageQuery {
        #[serde(default)]
        tab: usize,
    }

    #[instrument(level = "debug", skip(state, auth_session, session))]
    pub async fn index(
        State(state): State<Arc<AppState>>,
        auth_session: AuthSession,
        session: Session,
        Query(PageQuery { tab }): Query<PageQuery>,
    ) -> HtmlResult {
        let document = state.store.load()?;
        let auth = auth_state(&auth_session);

        let mut session_state = SessionState::load(&session).await?;
        let flash = session_state.take_flash();
        let mut changed = flash.is_some();
        if auth.is_authenticated() && session_state.show_admin && session_state.draft.is_none() {
            session_state.draft_or_load(&state.store)?;
            changed = true;
        }
        if changed {
            session_state.store(&session).await?;
        }

        let request = ViewRequest {
            auth,
            gate_configured: state.gate.is_configured(),
            secret_key: &state.config.auth.secret_key,
            active_tab: tab,
            show_admin: session_state.show_admin,
            draft: session_state.draft.as_ref(),
        };
        let view = render(&document, &request, flash, &state.assets);

        PageMetrics::view();
        Ok(templates::page(&view))
    }

    pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
        match state.health_check() {
            Ok(()) => (StatusCode::OK, "OK"),
            Err(err) => {
                tracing::warn!(?err, "Health check failed");
                (StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
            }
        }
    }

    pub async fn favicon() -> impl IntoResponse {
        StatusCode::NOT_FOUND
    }
}
