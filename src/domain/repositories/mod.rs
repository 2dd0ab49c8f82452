//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the external stores the service depends on. They are
//! implemented by PostgreSQL repositories in `crate::infrastructure::persistence`
//! and mocked with `mockall` in unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Links with conditional click/deactivation updates
//! - [`UserRepository`] - Registered accounts
//! - [`TokenRepository`] - One session row per user
//! - [`SecretRepository`] - Write-once key material
//!
//! # Concurrency
//!
//! No repository method takes a lock. Every mutation that can race carries its
//! own precondition and reports whether it applied; callers treat a failed
//! precondition as the signal that another writer got there first.

pub mod link_repository;
pub mod secret_repository;
pub mod token_repository;
pub mod user_repository;

pub use link_repository::LinkRepository;
pub use secret_repository::SecretRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use secret_repository::MockSecretRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
