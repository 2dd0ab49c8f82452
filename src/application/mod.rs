//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and background jobs.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link lifecycle and expiry sweeps
//! - [`services::session_service::SessionService`] - Encrypted session tokens
//! - [`services::key_provisioner::KeyProvisioner`] - One key pair per deployment
//! - [`services::account_service::AccountService`] - Sign-up and sign-in

pub mod services;
