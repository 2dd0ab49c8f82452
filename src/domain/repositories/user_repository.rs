//! Repository trait for registered accounts.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for users. Read-only apart from registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError>;

    /// Looks up a user by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
}
