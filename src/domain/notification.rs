//! Email notification messages exchanged through the notification queue.

use serde::{Deserialize, Serialize};

/// Subject line of deactivation emails.
pub const DEACTIVATION_SUBJECT: &str = "Link Deactivated";

/// A message for the email worker.
///
/// Serialized as JSON on the queue: `{"subject", "body", "recipient"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

impl Notification {
    /// Tells a link owner that one of their links no longer resolves.
    pub fn link_deactivated(recipient: &str, short_link: &str, original_link: &str) -> Self {
        Self {
            subject: DEACTIVATION_SUBJECT.to_string(),
            body: format!("Your link {short_link} to {original_link} has been deactivated."),
            recipient: recipient.to_string(),
        }
    }
}
