//! Email delivery collaborators.
//!
//! - [`Mailer`] - Delivery trait consumed by the mail worker
//! - [`LogMailer`] - Writes each email as a structured log event

mod log_mailer;
mod service;

pub use log_mailer::LogMailer;
pub use service::{MailError, Mailer};

#[cfg(test)]
pub use service::MockMailer;
