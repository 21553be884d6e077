use anyhow::Context;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Minimum length of a configured session signing key, in bytes.
pub const SESSION_SIGNING_KEY_MIN_LEN: usize = 64;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn parse() -> anyhow::Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::with_name(config_file_path("config.toml")?.as_str()).required(false))
            .add_source(File::with_name("config.toml").required(false))
            .add_source(
                Environment::with_prefix("linktabs")
                    .separator("-")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build config")?
            .try_deserialize::<Self>()
            .context("Failed to deserialize config")?;

        if !config.session.signing_key.is_empty()
            && config.session.signing_key.len() < SESSION_SIGNING_KEY_MIN_LEN
        {
            anyhow::bail!(
                "Session signing key must be at least {SESSION_SIGNING_KEY_MIN_LEN} bytes long"
            );
        }

        Ok(config)
    }
}

pub fn config_file_path(file_name: impl AsRef<Path>) -> anyhow::Result<String> {
    Ok(Path::new("/etc")
        .join(env!("CARGO_PKG_NAME").to_lowercase())
        .join(file_name)
        .to_str()
        .context("Failed to build config file path")?
        .to_string())
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub metrics_bind_addr: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            metrics_bind_addr: "0.0.0.0:9200".to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    pub secure: bool,
    pub http_only: bool,
    /// Sessions expire after this many seconds of inactivity.
    pub expiry_secs: i64,
    /// Key used to sign session cookies. If empty, a random key is generated
    /// on startup and sessions do not survive a restart.
    pub signing_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secure: false,
            http_only: true,
            expiry_secs: 86400, // 1 day
            signing_key: "".to_string(),
        }
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secure", &self.secure)
            .field("http_only", &self.http_only)
            .field("expiry_secs", &self.expiry_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// The JSON document holding site, tabs and items.
    pub data_file: PathBuf,
    /// Directory relative asset paths and logo candidates resolve against.
    pub asset_root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("links.json"),
            asset_root: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// TOML file consulted before the environment for the admin secret.
    pub secrets_file: PathBuf,
    /// Key looked up in `secrets_file` and name of the environment variable.
    pub secret_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secrets_file: PathBuf::from("secrets.toml"),
            secret_key: "ADMIN_PASSWORD".to_string(),
        }
    }
}
