//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::lifetime::Expiry;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const COLUMNS: &str = "link_id, short_code, original_link, clicks, expiry_policy, expiry_at, \
                       is_active, created_at, owner_id, owner_email";

#[derive(Debug, FromRow)]
struct LinkRow {
    link_id: Uuid,
    short_code: String,
    original_link: String,
    clicks: i64,
    expiry_policy: String,
    expiry_at: Option<DateTime<Utc>>,
    is_active: bool,
    created_at: DateTime<Utc>,
    owner_id: Uuid,
    owner_email: String,
}

impl TryFrom<LinkRow> for Link {
    type Error = AppError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        let expiry = Expiry::from_parts(&row.expiry_policy, row.expiry_at).ok_or_else(|| {
            tracing::error!(
                link_id = %row.link_id,
                policy = %row.expiry_policy,
                "Stored link has an inconsistent expiry"
            );
            AppError::internal("Database error", serde_json::json!({}))
        })?;

        Ok(Link {
            link_id: row.link_id,
            short_code: row.short_code,
            original_link: row.original_link,
            clicks: row.clicks,
            expiry,
            is_active: row.is_active,
            created_at: row.created_at,
            owner_id: row.owner_id,
            owner_email: row.owner_email,
        })
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Click and deactivation updates carry `is_active` in their `WHERE` clause,
/// so a deactivated link is never written to again.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    table: String,
}

impl PgLinkRepository {
    /// Creates a new repository over `table`, which must be a valid identifier.
    pub fn new(pool: Arc<PgPool>, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let sql = format!(
            r#"
            INSERT INTO {table}
                (link_id, short_code, original_link, clicks, expiry_policy, expiry_at,
                 is_active, created_at, owner_id, owner_email)
            VALUES ($1, $2, $3, 0, $4, $5, TRUE, $6, $7, $8)
            RETURNING {COLUMNS}
            "#,
            table = self.table
        );

        let row: LinkRow = sqlx::query_as(&sql)
            .bind(new_link.link_id)
            .bind(&new_link.short_code)
            .bind(&new_link.original_link)
            .bind(new_link.expiry.policy())
            .bind(new_link.expiry.deadline())
            .bind(new_link.created_at)
            .bind(new_link.owner_id)
            .bind(&new_link.owner_email)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, link_id: Uuid) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} WHERE link_id = $1",
            table = self.table
        );

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(link_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Link::try_from).transpose()
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {table} WHERE short_code = $1",
            table = self.table
        );

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(Link::try_from).transpose()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {table}
            WHERE owner_id = $1
            ORDER BY created_at, link_id
            "#,
            table = self.table
        );

        let rows: Vec<LinkRow> = sqlx::query_as(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(Link::try_from).collect()
    }

    async fn increment_clicks(&self, link_id: Uuid) -> Result<bool, AppError> {
        let sql = format!(
            r#"
            UPDATE {table}
            SET clicks = clicks + 1
            WHERE link_id = $1 AND is_active
            "#,
            table = self.table
        );

        let result = sqlx::query(&sql)
            .bind(link_id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn deactivate(&self, link_id: Uuid) -> Result<bool, AppError> {
        let sql = format!(
            r#"
            UPDATE {table}
            SET is_active = FALSE
            WHERE link_id = $1 AND is_active
            RETURNING link_id
            "#,
            table = self.table
        );

        let flipped: Option<Uuid> = sqlx::query_scalar(&sql)
            .bind(link_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(flipped.is_some())
    }

    async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM {table}
            WHERE is_active
              AND expiry_at IS NOT NULL
              AND expiry_at <= $1
            ORDER BY expiry_at
            "#,
            table = self.table
        );

        let rows: Vec<LinkRow> = sqlx::query_as(&sql)
            .bind(now)
            .fetch_all(self.pool.as_ref())
            .await?;

        rows.into_iter().map(Link::try_from).collect()
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
