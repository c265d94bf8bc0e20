pub mod file;
pub mod postgres;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{AppConfig, StorageConfig};

pub use file::FileStore;
pub use postgres::PgStore;

/// Connect timeout for the networked backend.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The tracked record. Ids are positive, unique, and never reused after
/// deletion; `created_at` is set once and `last_modified` moves forward on
/// every successful edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Problem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: NaiveDateTime,
    pub last_modified: NaiveDateTime,
}

/// Errors from the store boundary. I/O failures against the underlying
/// medium are normalized here; callers never see raw sqlx or filesystem
/// errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("problem not found")]
    NotFound,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persistence contract shared by the file and Postgres backends. Both
/// expose identical observable semantics; the service layer never branches
/// on which one is active.
#[async_trait]
pub trait ProblemStore: Send + Sync {
    /// All current records, in no particular order. Reads degrade
    /// gracefully: an unreadable or corrupt medium yields an empty list.
    async fn list(&self) -> Vec<Problem>;

    async fn get(&self, id: i64) -> Result<Problem, StoreError>;

    /// Assigns the next id and stamps `created_at == last_modified`.
    async fn create(&self, title: &str, description: &str) -> Result<Problem, StoreError>;

    /// Overwrites title/description and refreshes `last_modified`;
    /// `created_at` is untouched.
    async fn update(&self, id: i64, title: &str, description: &str)
        -> Result<Problem, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Build the backend selected by configuration. The Postgres pool connects
/// lazily so a temporarily unreachable database does not prevent startup;
/// reads degrade to empty until it comes back.
pub async fn connect(config: &AppConfig) -> anyhow::Result<Arc<dyn ProblemStore>> {
    match &config.storage {
        StorageConfig::File { path } => {
            tracing::info!("using file store at {}", path.display());
            Ok(Arc::new(FileStore::new(path.clone())))
        }
        StorageConfig::Postgres { url } => {
            let store = PgStore::connect(url, CONNECT_TIMEOUT)?;
            if let Err(e) = store.ensure_schema().await {
                tracing::warn!("could not ensure problems table yet: {}", e);
            }
            tracing::info!("using postgres store");
            Ok(Arc::new(store))
        }
    }
}
