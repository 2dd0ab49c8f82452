//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`lifetime`] - Lifetime choices and the expiry policies derived from them
//! - [`notification`] - Deactivation email messages carried by the queue
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Repository traits are implemented in `crate::infrastructure`.
//!
//! # Link Lifecycle
//!
//! 1. A link is created active with an expiry derived from its [`lifetime::LifeTime`]
//! 2. Visits either count a click or, for single-use links, deactivate it
//! 3. The expiry sweep deactivates links whose deadline has passed
//! 4. Every deactivation enqueues exactly one [`notification::Notification`]

pub mod entities;
pub mod lifetime;
pub mod notification;
pub mod repositories;
