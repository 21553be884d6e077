pub mod app;
pub mod assets;
pub mod auth;
pub mod config;
pub mod editor;
pub mod http;
pub mod metrics;
pub mod render;
pub mod routes;
pub mod secrets;
pub mod session;
pub mod state;
pub mod store;
pub mod templates;
#[cfg(feature = "test-utils")]
pub mod test_utils;
pub mod validation;
