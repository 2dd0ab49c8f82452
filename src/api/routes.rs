//! API route configuration.
//!
//! Link management requires a session token via
//! [`crate::api::middleware::auth`]; account and visit routes are public.

use crate::api::handlers::{
    create_link_handler, deactivate_link_handler, list_links_handler, sign_in_handler,
    sign_up_handler, visit_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Link management routes. Callers must layer authentication on top.
///
/// # Endpoints
///
/// - `POST  /links`                     - Create a short link
/// - `GET   /links`                     - List the caller's links
/// - `PATCH /links/{linkId}/deactivate` - Deactivate one of the caller's links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler).get(list_links_handler))
        .route("/links/{link_id}/deactivate", patch(deactivate_link_handler))
}

/// Account routes.
///
/// # Endpoints
///
/// - `POST /auth/signup` - Register and receive a token
/// - `POST /auth/signin` - Sign in and receive a new token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(sign_up_handler))
        .route("/auth/signin", post(sign_in_handler))
}

/// Public short link resolution.
///
/// # Endpoints
///
/// - `GET /{shortCode}` - Resolve a short code
pub fn visit_routes() -> Router<AppState> {
    Router::new().route("/{short_code}", get(visit_handler))
}
