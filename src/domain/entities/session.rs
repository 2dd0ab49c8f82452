//! Session token rows, the claims they carry, and the caller identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored record of the single live session of a user.
///
/// Only a SHA-256 digest of the token is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionToken {
    pub token_id: Uuid,
    pub token_digest: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Claims encrypted inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub email: String,
}

/// A freshly issued token, returned to the client once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    pub token_id: Uuid,
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// The authenticated caller, resolved from the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}
