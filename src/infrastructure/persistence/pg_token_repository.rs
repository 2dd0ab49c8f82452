//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::SessionToken;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct TokenRow {
    token_id: Uuid,
    token_digest: String,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<TokenRow> for SessionToken {
    fn from(row: TokenRow) -> Self {
        Self {
            token_id: row.token_id,
            token_digest: row.token_digest,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for session tokens.
///
/// Stores hashed tokens (SHA-256) only. The unique index on `owner_id` keeps
/// one row per user; issuing upserts on it.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
    table: String,
}

impl PgTokenRepository {
    pub fn new(pool: Arc<PgPool>, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn replace_for_owner(&self, token: SessionToken) -> Result<SessionToken, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {table} (token_id, token_digest, owner_id, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (owner_id) DO UPDATE
            SET token_id = EXCLUDED.token_id,
                token_digest = EXCLUDED.token_digest,
                created_at = EXCLUDED.created_at
            RETURNING token_id, token_digest, owner_id, created_at
            "#,
            table = self.table
        );

        let row: TokenRow = sqlx::query_as(&sql)
            .bind(token.token_id)
            .bind(&token.token_digest)
            .bind(token.owner_id)
            .bind(token.created_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<SessionToken>, AppError> {
        let sql = format!(
            "SELECT token_id, token_digest, owner_id, created_at FROM {table} WHERE owner_id = $1",
            table = self.table
        );

        let rows: Vec<TokenRow> = sqlx::query_as(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(SessionToken::from).collect())
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let sql = format!(
            "DELETE FROM {table} WHERE created_at <= $1",
            table = self.table
        );

        let result = sqlx::query(&sql)
            .bind(cutoff)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
