//! Problem service: validates input, coordinates the store, and maps store
//! results into API error kinds. Handlers never talk to the store directly.

use std::sync::Arc;

use crate::error::ApiError;
use crate::store::{Problem, ProblemStore};

#[derive(Clone)]
pub struct ProblemService {
    store: Arc<dyn ProblemStore>,
}

impl ProblemService {
    pub fn new(store: Arc<dyn ProblemStore>) -> Self {
        Self { store }
    }

    /// All problems, newest first. Ties on `created_at` break on descending
    /// id so repeated calls never reorder records relative to each other.
    pub async fn list(&self) -> Vec<Problem> {
        let mut problems = self.store.list().await;
        problems.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        problems
    }

    pub async fn get(&self, id: i64) -> Result<Problem, ApiError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn create(&self, title: &str, description: &str) -> Result<Problem, ApiError> {
        let (title, description) = validate(title, description)?;
        tracing::info!("adding new problem: {}", title);
        Ok(self.store.create(title, description).await?)
    }

    pub async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
    ) -> Result<Problem, ApiError> {
        let (title, description) = validate(title, description)?;
        tracing::info!("editing problem {}: {}", id, title);
        Ok(self.store.update(id, title, description).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.store.delete(id).await?;
        tracing::info!("deleted problem with id {}", id);
        Ok(())
    }
}

/// Trim both fields and reject if either is empty afterwards. Runs before
/// any store access.
fn validate<'a>(title: &'a str, description: &'a str) -> Result<(&'a str, &'a str), ApiError> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(ApiError::validation("Title and description are required"));
    }
    Ok((title, description))
}
