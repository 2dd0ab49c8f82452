//! Repository trait for write-once secrets.

use crate::error::AppError;
use async_trait::async_trait;

/// Durable key/value store for cryptographic material.
///
/// Values are never updated or deleted once written.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretRepository: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<String>, AppError>;

    /// Stores `value` under `name` unless a value is already present.
    ///
    /// Returns `Ok(true)` if this call wrote the value, `Ok(false)` if another
    /// writer was first.
    async fn create_if_absent(&self, name: &str, value: &str) -> Result<bool, AppError>;
}
