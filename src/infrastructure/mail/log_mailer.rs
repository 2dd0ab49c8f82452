//! Mailer that records emails in the log instead of sending them.

use super::service::{MailError, Mailer};
use async_trait::async_trait;
use tracing::info;

use crate::domain::notification::Notification;

/// Emits one `INFO` event per email with sender, recipient, subject and body.
///
/// Used when no email provider is wired in; the events can be shipped to any
/// log-based alerting pipeline.
pub struct LogMailer {
    from: String,
}

impl LogMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, notification: &Notification) -> Result<(), MailError> {
        if notification.recipient.trim().is_empty() {
            return Err(MailError::Rejected("empty recipient".to_string()));
        }

        info!(
            from = %self.from,
            to = %notification.recipient,
            subject = %notification.subject,
            body = %notification.body,
            "Email sent"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_accepts_recipient() {
        let mailer = LogMailer::new("no-reply@localhost");
        let n = Notification::link_deactivated("owner@example.com", "s", "o");

        assert!(mailer.send(&n).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_rejects_empty_recipient() {
        let mailer = LogMailer::new("no-reply@localhost");
        let n = Notification::link_deactivated("  ", "s", "o");

        assert!(matches!(mailer.send(&n).await, Err(MailError::Rejected(_))));
    }
}
