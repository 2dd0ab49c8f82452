//! Repository trait for session token rows.

use crate::domain::entities::SessionToken;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for session tokens.
///
/// The store holds at most one row per owner.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Atomically replaces whatever row the owner had with `token`.
    ///
    /// Concurrent calls for the same owner leave exactly one row: the last
    /// writer's.
    async fn replace_for_owner(&self, token: SessionToken) -> Result<SessionToken, AppError>;

    /// Lists the session rows of an owner.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<SessionToken>, AppError>;

    /// Deletes rows created at or before `cutoff`, returning how many went.
    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
