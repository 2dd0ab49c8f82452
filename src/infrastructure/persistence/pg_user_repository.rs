//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for registered accounts.
///
/// The unique constraint on `email` is what rejects duplicate sign-ups.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
    table: String,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {table} (user_id, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING user_id, email, password_hash, created_at, updated_at
            "#,
            table = self.table
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(new_user.user_id)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.created_at)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT user_id, email, password_hash, created_at, updated_at FROM {table} WHERE user_id = $1",
            table = self.table
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(user_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!(
            "SELECT user_id, email, password_hash, created_at, updated_at FROM {table} WHERE email = $1",
            table = self.table
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(User::from))
    }
}
