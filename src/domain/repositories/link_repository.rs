//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the link id or short code is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its internal id.
    async fn find_by_id(&self, link_id: Uuid) -> Result<Option<Link>, AppError>;

    /// Finds a link by its public short code, active or not.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<Link>, AppError>;

    /// Lists every link owned by `owner_id` in store order.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Link>, AppError>;

    /// Adds one click to a link that still exists and is still active.
    ///
    /// Returns `Ok(false)` when the precondition failed.
    async fn increment_clicks(&self, link_id: Uuid) -> Result<bool, AppError>;

    /// Flips `is_active` to false if the link exists and is still active.
    ///
    /// Returns `Ok(true)` only for the single caller whose update applied;
    /// every later or concurrent caller gets `Ok(false)`.
    async fn deactivate(&self, link_id: Uuid) -> Result<bool, AppError>;

    /// Returns active links whose fixed deadline is at or before `now`.
    async fn find_matured(&self, now: DateTime<Utc>) -> Result<Vec<Link>, AppError>;

    /// Checks store connectivity.
    async fn ping(&self) -> Result<(), AppError>;
}
