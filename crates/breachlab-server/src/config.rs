use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

use crate::sinks;

/// Immutable application configuration, built once and handed to
/// [`LabServer::new`](crate::server::LabServer::new).
///
/// The defaults are the lab's documented insecure values; a
/// `breachlab.toml` in the working directory can override them for
/// classroom setups that need a different port or data location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabConfig {
    /// Bind address, e.g. "127.0.0.1:5000"
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Path to the SQLite file created by `breachlab init-db`.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Directory the upload sink writes into.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Application secret. Ships hardcoded (VULN #1).
    #[serde(default = "default_secret_key")]
    pub secret_key: String,

    /// Debug mode flag. Ships enabled (VULN #7).
    #[serde(default = "default_debug")]
    pub debug: bool,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_database_path() -> String {
    "users.db".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_secret_key() -> String {
    sinks::DEV_SECRET_KEY.to_string()
}

fn default_debug() -> bool {
    sinks::DEBUG_MODE
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database_path: default_database_path(),
            upload_dir: default_upload_dir(),
            secret_key: default_secret_key(),
            debug: default_debug(),
        }
    }
}

impl LabConfig {
    /// Load configuration from `breachlab.toml` (or `$BREACHLAB_CONFIG`),
    /// falling back to the defaults when no file exists.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        let cfg: LabConfig = toml::from_str(&raw)?;
        Ok(cfg)
    }
}

fn config_path() -> PathBuf {
    if let Ok(p) = env::var("BREACHLAB_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("breachlab.toml")
}
