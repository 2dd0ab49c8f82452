//! Handler for public short link visits.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::links::VisitResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a short code to its destination.
///
/// # Endpoint
///
/// `GET /{shortCode}`
///
/// The destination is returned as JSON rather than a redirect:
///
/// ```json
/// { "link": "https://example.com/page" }
/// ```
///
/// A single-use link stops resolving after this call. Unknown, inactive and
/// expired codes all return the same `404`.
pub async fn visit_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Json<VisitResponse>, AppError> {
    let link = state.link_service.resolve(&short_code).await?;

    Ok(Json(VisitResponse { link }))
}
