//! PostgreSQL implementation of secret repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::SecretRepository;
use crate::error::AppError;

/// PostgreSQL repository for write-once secrets.
pub struct PgSecretRepository {
    pool: Arc<PgPool>,
    table: String,
}

impl PgSecretRepository {
    pub fn new(pool: Arc<PgPool>, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl SecretRepository for PgSecretRepository {
    async fn get(&self, name: &str) -> Result<Option<String>, AppError> {
        let sql = format!("SELECT value FROM {table} WHERE name = $1", table = self.table);

        let value: Option<String> = sqlx::query_scalar(&sql)
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(value)
    }

    async fn create_if_absent(&self, name: &str, value: &str) -> Result<bool, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {table} (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
            table = self.table
        );

        let result = sqlx::query(&sql)
            .bind(name)
            .bind(value)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
