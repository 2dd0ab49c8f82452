//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET   /{shortCode}`                - Resolve a short link (public)
//! - `GET   /health`                     - Health check: DB, queue, key material (public)
//! - `POST  /auth/signup`, `/auth/signin` - Accounts (public, stricter rate limit)
//! - `/links*`                           - Link management (session token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Encrypted session token
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, RateLimit};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Rate limits applied by [`app_router`].
#[derive(Debug, Clone, Copy)]
pub struct RateLimits {
    pub public: RateLimit,
    pub auth: RateLimit,
}

/// Routes and authentication without rate limiting or tracing.
///
/// Used directly by integration tests, which have no peer address for the
/// per-IP limiter to key on.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .merge(protected(&state))
        .merge(api::routes::auth_routes())
        .merge(api::routes::visit_routes())
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Constructs the application router with all routes and middleware.
///
/// # Errors
///
/// Returns an error if a rate limit has a zero parameter.
pub fn app_router(state: AppState, limits: RateLimits) -> Result<NormalizePath<Router>> {
    let public_limit = rate_limit::layer(limits.public).context("invalid public rate limit")?;
    let auth_limit = rate_limit::layer(limits.auth).context("invalid auth rate limit")?;

    let router = Router::new()
        .merge(protected(&state).layer(public_limit.clone()))
        .merge(api::routes::auth_routes().layer(auth_limit))
        .merge(api::routes::visit_routes().layer(public_limit))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}

fn protected(state: &AppState) -> Router<AppState> {
    api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
}
