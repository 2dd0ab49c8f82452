//! Registered account.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user. The email is stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Canonical form of an email address used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
