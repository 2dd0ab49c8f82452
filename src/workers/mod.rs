//! Background loops spawned next to the HTTP server.
//!
//! - [`mail_worker`] - Drains the notification queue into the mailer
//! - [`scheduler`] - Periodic link expiry and stale token cleanup

pub mod mail_worker;
pub mod scheduler;

pub use mail_worker::{deliver, run_mail_worker};
pub use scheduler::{run_link_expiry_job, run_token_cleanup_job};
