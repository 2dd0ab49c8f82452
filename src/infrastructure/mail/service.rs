//! Mailer trait and error types.

use async_trait::async_trait;

use crate::domain::notification::Notification;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Recipient rejected: {0}")]
    Rejected(String),
    #[error("Mail transport error: {0}")]
    Transport(String),
}

/// Sends a single email built from a queue message.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), MailError>;
}
