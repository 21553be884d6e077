use crate::assets::AssetResolver;
use crate::auth::AuthGate;
use crate::config::AppConfig;
use crate::store::{DocumentStore, StoreError};
use anyhow::Context;
use std::sync::Arc;
use tower_sessions::cookie::Key;

pub struct AppState {
    pub config: AppConfig,
    pub store: DocumentStore,
    pub assets: AssetResolver,
    pub gate: Arc<AuthGate>,
    session_key: Key,
}

impl AppState {
    /// `secret` is the admin password as resolved at startup; `None` leaves
    /// the admin gate unconfigured.
    pub fn new(config: AppConfig, secret: Option<String>) -> anyhow::Result<Self> {
        let session_key = if config.session.signing_key.is_empty() {
            tracing::debug!("No session signing key configured, generating one");
            Key::generate()
        } else {
            Key::try_from(config.session.signing_key.as_bytes())
                .context("Invalid session signing key")?
        };

        Ok(Self {
            store: DocumentStore::new(&config.storage.data_file),
            assets: AssetResolver::new(&config.storage.asset_root),
            gate: Arc::new(AuthGate::new(secret)),
            session_key,
            config,
        })
    }

    pub fn session_key(&self) -> &Key {
        &self.session_key
    }

    /// Healthy as long as the backing document can be loaded.
    pub fn health_check(&self) -> Result<(), StoreError> {
        self.store.load().map(|_| ())
    }
}
