use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Default location of the flat-file backend, relative to the working directory.
const DEFAULT_DATA_FILE: &str = "data/problems.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PASSWORD must be set")]
    MissingPassword,
}

/// Runtime configuration, loaded once at startup and injected through
/// application state rather than read from the environment ad hoc.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The single shared password compared on login.
    pub password: String,
    /// Secret used to sign session tokens.
    pub session_secret: String,
    /// Session token lifetime in hours.
    pub session_ttl_hours: i64,
    pub storage: StorageConfig,
}

/// Which persistence backend to use, decided once at startup.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Pretty-printed JSON array at the given path.
    File { path: PathBuf },
    /// PostgreSQL `problems` table.
    Postgres { url: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let password = env::var("PASSWORD").map_err(|_| ConfigError::MissingPassword)?;

        let session_secret = match env::var("SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("SECRET_KEY not set, using insecure development default");
                "your-secret-key-here".to_string()
            }
        };

        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(24 * 7);

        // DATABASE_URL selects the relational backend; otherwise fall back to
        // the flat file at DATA_FILE.
        let storage = match env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => StorageConfig::Postgres { url },
            _ => StorageConfig::File {
                path: env::var("DATA_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE)),
            },
        };

        Ok(Self {
            password,
            session_secret,
            session_ttl_hours,
            storage,
        })
    }
}
