//! Flat-file backend: a pretty-printed JSON array of problems at a
//! configured path, rewritten in full on every mutation.
//!
//! Writes are serialized by a process-wide async mutex held across the whole
//! load-mutate-save cycle, so concurrent requests cannot lose updates. The
//! file is only written after the in-memory mutation has fully succeeded.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::{Problem, ProblemStore, StoreError};

pub struct FileStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

struct FileState {
    /// Monotonic id hint, seeded from max(id)+1 on first use and never
    /// decremented, so ids are not reused after deleting the highest record.
    next_id: Option<i64>,
}

/// On-disk record shape. Older files may carry `timestamp` instead of
/// `created_at`; both are accepted and normalized on load.
#[derive(Deserialize)]
struct RawProblem {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    created_at: Option<NaiveDateTime>,
    last_modified: Option<NaiveDateTime>,
    timestamp: Option<NaiveDateTime>,
}

impl RawProblem {
    fn normalize(self) -> Problem {
        let created_at = self
            .created_at
            .or(self.timestamp)
            .unwrap_or_else(|| chrono::DateTime::<Utc>::UNIX_EPOCH.naive_utc());
        let last_modified = self.last_modified.unwrap_or(created_at).max(created_at);
        Problem {
            id: self.id,
            title: self.title,
            description: self.description,
            created_at,
            last_modified,
        }
    }
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: Mutex::new(FileState { next_id: None }),
        }
    }

    /// Load the whole collection. A missing, unreadable, or corrupt file
    /// degrades to an empty collection rather than propagating.
    async fn load(&self) -> Vec<Problem> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::error!("failed to read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<RawProblem>>(&bytes) {
            Ok(raw) => raw.into_iter().map(RawProblem::normalize).collect(),
            Err(e) => {
                tracing::error!("corrupt problem file {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    async fn save(&self, problems: &[Problem]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        let bytes = serde_json::to_vec_pretty(problems)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl ProblemStore for FileStore {
    async fn list(&self) -> Vec<Problem> {
        // Hold the lock for reads too, so a half-written file is never seen.
        let _guard = self.state.lock().await;
        self.load().await
    }

    async fn get(&self, id: i64) -> Result<Problem, StoreError> {
        let _guard = self.state.lock().await;
        self.load()
            .await
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, title: &str, description: &str) -> Result<Problem, StoreError> {
        let mut state = self.state.lock().await;
        let mut problems = self.load().await;

        let max_id = problems.iter().map(|p| p.id).max().unwrap_or(0);
        let id = state.next_id.map_or(max_id + 1, |n| n.max(max_id + 1));

        let now = Utc::now().naive_utc();
        let problem = Problem {
            id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: now,
            last_modified: now,
        };
        problems.push(problem.clone());
        self.save(&problems).await?;

        // Only advance the counter once the write has landed.
        state.next_id = Some(id + 1);
        Ok(problem)
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
    ) -> Result<Problem, StoreError> {
        let _guard = self.state.lock().await;
        let mut problems = self.load().await;

        let problem = problems
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;

        // Keep last_modified strictly increasing even at clock resolution.
        let now = Utc::now().naive_utc();
        let stamp = if now > problem.last_modified {
            now
        } else {
            problem.last_modified + chrono::Duration::microseconds(1)
        };

        problem.title = title.to_string();
        problem.description = description.to_string();
        problem.last_modified = stamp;
        let updated = problem.clone();

        self.save(&problems).await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let _guard = self.state.lock().await;
        let mut problems = self.load().await;

        let before = problems.len();
        problems.retain(|p| p.id != id);
        if problems.len() == before {
            return Err(StoreError::NotFound);
        }

        self.save(&problems).await
    }
}
