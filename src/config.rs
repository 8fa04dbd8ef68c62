//! Portal configuration

use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level portal configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listen address, e.g. "127.0.0.1:8080"
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// SeaORM connection URL (sqlite or postgres)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Root directory for uploaded media
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,

    /// HS256 signing secret for session tokens
    #[serde(default = "default_token_secret")]
    pub token_secret: String,

    /// Session token lifetime in seconds
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// Per-room broadcast channel capacity; lagging sockets skip past events
    #[serde(default = "default_room_capacity")]
    pub room_capacity: usize,

    /// Maximum decoded upload size in bytes
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,

    /// Administrator account created at startup when missing
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// First-run administrator credentials
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            database_url: default_database_url(),
            media_root: default_media_root(),
            token_secret: default_token_secret(),
            token_ttl_secs: default_token_ttl_secs(),
            room_capacity: default_room_capacity(),
            max_upload_size: default_max_upload_size(),
            bootstrap_admin: None,
        }
    }
}

impl Config {
    /// Load configuration from an optional YAML file with `PORTAL_` env
    /// variable overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment.merge(Env::prefixed("PORTAL_")).extract()?;
        Ok(config)
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_database_url() -> String {
    "sqlite://portal.db?mode=rwc".to_string()
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

fn default_token_secret() -> String {
    // Development fallback; deployments override via PORTAL_TOKEN_SECRET
    "insecure-dev-secret".to_string()
}

fn default_token_ttl_secs() -> u64 {
    12 * 60 * 60
}

fn default_room_capacity() -> usize {
    256
}

fn default_max_upload_size() -> usize {
    25 * 1024 * 1024
}
