//! Session token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{error::AppError, state::AppState};

/// Authenticates requests from the session token in the `Authorization`
/// header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// The value must be exactly two whitespace-separated parts; the scheme word
/// is not checked.
///
/// # Authentication Flow
///
/// 1. Read the raw `Authorization` header
/// 2. Decrypt the token with the deployment private key
/// 3. Re-read the user named by the token
/// 4. Insert the caller's [`Identity`](crate::domain::entities::Identity)
///    into request extensions and continue
///
/// # Errors
///
/// Returns `401 Unauthorized` with `WWW-Authenticate: Bearer` if the header
/// is missing, malformed, or the token does not open or names no user.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/links", get(list_links_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AppError::unauthorized("Not authorized", serde_json::json!({}))
        })?),
        None => None,
    };

    let identity = st.session_service.authenticate_request(header).await?;
    tracing::debug!(user_id = %identity.user_id, "Authenticated request");

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
