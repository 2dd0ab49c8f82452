//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs live next to the
//! entity they produce (`NewLink`, `NewUser`).
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL with an expiry policy
//! - [`User`] - A registered account
//! - [`SessionToken`] - The stored record of a user's live session
//! - [`KeyPair`] - RSA key material used for session tokens

pub mod key_material;
pub mod link;
pub mod session;
pub mod user;

pub use key_material::{KeyError, KeyPair, PRIVATE_KEY, PUBLIC_KEY};
pub use link::{Link, LinkSummary, NewLink};
pub use session::{Identity, IssuedToken, SessionClaims, SessionToken};
pub use user::{NewUser, User, normalize_email};
