//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod links;
pub mod visit;

pub use auth::{sign_in_handler, sign_up_handler};
pub use health::health_handler;
pub use links::{create_link_handler, deactivate_link_handler, list_links_handler};
pub use visit::visit_handler;
