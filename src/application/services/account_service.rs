//! Account registration and sign-in.

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use super::SessionService;
use crate::domain::entities::{IssuedToken, NewUser, User, normalize_email};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// Result of a successful sign-up.
#[derive(Debug, Clone)]
pub struct SignUp {
    pub user: User,
    pub token: IssuedToken,
}

/// Registers users and exchanges credentials for session tokens.
///
/// Passwords are trimmed and hashed with bcrypt on the blocking pool.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionService>,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<SessionService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            users,
            sessions,
            bcrypt_cost,
        }
    }

    /// Registers a new account and issues its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered,
    /// including when a concurrent sign-up wins the race.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, AppError> {
        let email = normalize_email(email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(email_exists());
        }

        let password = password.trim().to_string();
        let cost = self.bcrypt_cost;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                AppError::internal("Password hashing failed", json!({}))
            })?
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                AppError::internal("Password hashing failed", json!({}))
            })?;

        let user = self
            .users
            .create(NewUser {
                user_id: Uuid::new_v4(),
                email,
                password_hash,
                created_at: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => email_exists(),
                other => other,
            })?;

        info!(user_id = %user.user_id, "User registered");

        let token = self.sessions.issue(user.user_id, &user.email).await?;
        Ok(SignUp { user, token })
    }

    /// Verifies credentials and issues a token that replaces the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with the same message for an unknown
    /// email and a wrong password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(invalid_credentials());
        };

        let password = password.trim().to_string();
        let hash = user.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                error!(error = %e, "Password verification task failed");
                AppError::internal("Password verification failed", json!({}))
            })?
            .unwrap_or_else(|e| {
                error!(user_id = %user.user_id, error = %e, "Stored password hash is unreadable");
                false
            });

        if !matched {
            return Err(invalid_credentials());
        }

        self.sessions.issue(user.user_id, &user.email).await
    }
}

fn email_exists() -> AppError {
    AppError::conflict("Email already exists", json!({}))
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password", json!({}))
}
