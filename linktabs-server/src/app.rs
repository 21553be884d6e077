use crate::auth::users::Backend;
use crate::http::error::AppError;
use crate::routes;
use crate::state::AppState;
use axum::Router;
use axum_login::AuthManagerLayerBuilder;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub fn create_app(state: Arc<AppState>) -> Router {
    let session_config = &state.config.session;
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(session_config.secure)
        .with_http_only(session_config.http_only)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(session_config.expiry_secs),
        ))
        .with_signed(state.session_key().clone());

    let auth_layer =
        AuthManagerLayerBuilder::new(Backend::new(state.gate.clone()), session_layer).build();

    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        .merge(routes::root::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/admin", routes::admin::routes())
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .merge(routes::root::untraced_routes())
        .fallback(|| async { AppError::NotFound })
        .layer((auth_layer, TimeoutLayer::new(request_timeout)))
        .with_state(state)
}
