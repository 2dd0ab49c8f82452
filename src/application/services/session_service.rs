//! Session token issuance, decryption and request authentication.

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::KeyProvisioner;
use crate::domain::entities::{Identity, IssuedToken, SessionClaims, SessionToken};
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use crate::utils::jwe;

/// Token rows older than this are removed by the cleanup job.
pub const STALE_TOKEN_DAYS: i64 = 7;

/// Hex SHA-256 digest under which a token is stored.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Issues encrypted session tokens and turns them back into identities.
///
/// Tokens are compact JWEs sealed with the deployment key pair. Each user has
/// at most one stored token row; issuing a new token replaces it.
pub struct SessionService {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
    keys: Arc<KeyProvisioner>,
}

impl SessionService {
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        users: Arc<dyn UserRepository>,
        keys: Arc<KeyProvisioner>,
    ) -> Self {
        Self {
            tokens,
            users,
            keys,
        }
    }

    /// Issues a token for `user_id`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if key provisioning, encryption or the
    /// token store fails.
    pub async fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AppError> {
        let keys = self.keys.ensure_key_pair().await?;

        let claims = SessionClaims {
            user_id,
            email: email.to_string(),
        };
        let plaintext = serde_json::to_vec(&claims).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode session claims");
            AppError::internal("Token issuance failed", json!({}))
        })?;
        let token = jwe::encrypt(keys.public_key(), &plaintext).map_err(|e| {
            tracing::error!(error = %e, "Failed to seal session token");
            AppError::internal("Token issuance failed", json!({}))
        })?;

        let stored = self
            .tokens
            .replace_for_owner(SessionToken {
                token_id: Uuid::new_v4(),
                token_digest: token_digest(&token),
                owner_id: user_id,
                created_at: Utc::now(),
            })
            .await?;

        metrics::counter!("tokens_issued_total").increment(1);
        debug!(user_id = %user_id, token_id = %stored.token_id, "Issued session token");

        Ok(IssuedToken {
            token_id: stored.token_id,
            token,
            created_at: stored.created_at,
        })
    }

    /// Opens a token and returns its claims. Does not consult the token store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for any token that cannot be opened
    /// with the stored key, including when no key has been provisioned yet.
    pub async fn decrypt(&self, token: &str) -> Result<SessionClaims, AppError> {
        let Some(keys) = self.keys.private_key().await? else {
            debug!("Token presented before any key was provisioned");
            return Err(token_not_valid());
        };

        let plaintext = jwe::decrypt(keys.private_key(), token).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            token_not_valid()
        })?;

        serde_json::from_slice(&plaintext).map_err(|e| {
            warn!(error = %e, "Authenticated token carried unexpected claims");
            token_not_valid()
        })
    }

    /// Resolves the caller from a raw `Authorization` header value.
    ///
    /// The header must be exactly two whitespace-separated parts. The first
    /// part is not interpreted. The identity comes from the user record, so a
    /// token for a deleted user is rejected.
    pub async fn authenticate_request(&self, header: Option<&str>) -> Result<Identity, AppError> {
        let header = header.ok_or_else(|| {
            AppError::unauthorized("Authorization header missing", json!({}))
        })?;

        let parts: Vec<&str> = header.split_whitespace().collect();
        let [_scheme, token] = parts.as_slice() else {
            return Err(AppError::unauthorized("Not authorized", json!({})));
        };

        let claims = self.decrypt(token).await?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(token_not_valid)?;

        Ok(Identity {
            user_id: user.user_id,
            email: user.email,
        })
    }

    /// Deletes token rows older than [`STALE_TOKEN_DAYS`] relative to `now`.
    pub async fn purge_stale(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let cutoff = now - Duration::days(STALE_TOKEN_DAYS);
        let removed = self.tokens.delete_created_before(cutoff).await?;

        metrics::counter!("tokens_purged_total").increment(removed);
        Ok(removed)
    }

    /// True once key material exists. Used by health checks.
    pub async fn keys_ready(&self) -> Result<bool, AppError> {
        Ok(self.keys.private_key().await?.is_some())
    }
}

fn token_not_valid() -> AppError {
    AppError::unauthorized("Token not valid", json!({}))
}
