use crate::config::AuthConfig;
use anyhow::Context;
use std::path::PathBuf;

/// Lookup chain for the admin secret: a TOML secrets file first, then the
/// process environment. Both are keyed by the same name.
#[derive(Debug, Clone)]
pub struct SecretSources {
    file: PathBuf,
    key: String,
}

impl SecretSources {
    pub fn new(file: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            key: key.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.secrets_file, &config.secret_key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The first non-empty secret found, if any. Values are returned verbatim.
    pub fn resolve(&self) -> Option<String> {
        match self.get_from_file() {
            Ok(Some(secret)) => {
                tracing::debug!(file = %self.file.display(), key = %self.key, "Using secret from secrets file");
                return Some(secret);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(?err, file = %self.file.display(), "Ignoring unreadable secrets file");
            }
        }

        let secret = self.get_from_env();
        if secret.is_some() {
            tracing::debug!(key = %self.key, "Using secret from environment");
        }
        secret
    }

    fn get_from_file(&self) -> anyhow::Result<Option<String>> {
        let contents = match std::fs::read_to_string(&self.file) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(anyhow::anyhow!(err).context("Failed to read secrets file")),
        };

        let table: toml::Table =
            toml::from_str(&contents).context("Failed to parse secrets file")?;

        Ok(table
            .get(&self.key)
            .map(|value| match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|secret| !secret.is_empty()))
    }

    fn get_from_env(&self) -> Option<String> {
        std::env::var(&self.key)
            .ok()
            .filter(|secret| !secret.is_empty())
    }
}
