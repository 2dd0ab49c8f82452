//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence, message queuing and email.
//!
//! # Modules
//!
//! - [`mail`] - Email delivery (log-backed mailer)
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`queue`] - Notification queue (Redis list and in-process channel)

pub mod mail;
pub mod persistence;
pub mod queue;
