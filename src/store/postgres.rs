//! PostgreSQL backend: one `problems` table, every operation a single atomic
//! statement on a pooled connection that is fully released before returning.
//!
//! Ids come from the table's sequence and are never reused, even across
//! restarts.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::{Problem, ProblemStore, StoreError};

const SELECT_COLUMNS: &str = "id, title, description, created_at, last_modified";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Build a lazily-connecting pool so startup does not depend on the
    /// database being reachable.
    pub fn connect(url: &str, connect_timeout: Duration) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(connect_timeout)
            .connect_lazy(url)?;
        Ok(Self { pool })
    }

    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS problems (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT now(),
                last_modified TIMESTAMP NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl ProblemStore for PgStore {
    async fn list(&self) -> Vec<Problem> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM problems ORDER BY created_at DESC, id DESC"
        );
        match sqlx::query_as::<_, Problem>(&sql).fetch_all(&self.pool).await {
            Ok(problems) => problems,
            Err(e) => {
                tracing::error!("failed to list problems: {}", e);
                Vec::new()
            }
        }
    }

    async fn get(&self, id: i64) -> Result<Problem, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM problems WHERE id = $1");
        sqlx::query_as::<_, Problem>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or(StoreError::NotFound)
    }

    async fn create(&self, title: &str, description: &str) -> Result<Problem, StoreError> {
        let now = Utc::now().naive_utc();
        let sql = format!(
            "INSERT INTO problems (title, description, created_at, last_modified)
             VALUES ($1, $2, $3, $3)
             RETURNING {SELECT_COLUMNS}"
        );
        sqlx::query_as::<_, Problem>(&sql)
            .bind(title)
            .bind(description)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        description: &str,
    ) -> Result<Problem, StoreError> {
        let now = Utc::now().naive_utc();
        // GREATEST keeps last_modified strictly increasing even if the
        // clock has not advanced past the previous value.
        let sql = format!(
            "UPDATE problems SET title = $2, description = $3,
                 last_modified = GREATEST($4, last_modified + interval '1 microsecond')
             WHERE id = $1
             RETURNING {SELECT_COLUMNS}"
        );
        sqlx::query_as::<_, Problem>(&sql)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?
            .ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM problems WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unavailable)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
