//! Handlers for the authenticated link endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::links::{
    CreateLinkRequest, CreateLinkResponse, LinkItem, ListLinksResponse, MessageResponse,
};
use crate::application::services::DeactivationOutcome;
use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link owned by the caller.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Request Body
///
/// ```json
/// { "originalLink": "https://example.com/page", "lifeTime": "1_DAY" }
/// ```
///
/// `lifeTime` is one of `AFTER_THE_LINK`, `1_DAY`, `3_DAYS`, `7_DAYS`.
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "message": "Created a short link", "shortLink": "http://localhost:3000/Xk3_a9Qm2LpZ" }
/// ```
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let created = state
        .link_service
        .create(&identity, &payload.original_link, &payload.life_time)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            message: "Created a short link".to_string(),
            short_link: created.short_link,
        }),
    ))
}

/// Lists the caller's links.
///
/// # Endpoint
///
/// `GET /links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<ListLinksResponse>, AppError> {
    let links = state.link_service.list(identity.user_id).await?;

    Ok(Json(ListLinksResponse {
        links: links.into_iter().map(LinkItem::from).collect(),
    }))
}

/// Deactivates one of the caller's links.
///
/// # Endpoint
///
/// `PATCH /links/{linkId}/deactivate`
///
/// Repeating the call on an inactive link succeeds with a different message.
///
/// # Errors
///
/// - `400` if `linkId` is not a UUID
/// - `404` if the link does not exist or belongs to another user
pub async fn deactivate_link_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(link_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let link_id = Uuid::parse_str(&link_id)
        .map_err(|_| AppError::bad_request("Invalid link id", json!({ "linkId": link_id })))?;

    let (link, outcome) = state
        .link_service
        .deactivate(identity.user_id, link_id)
        .await?;
    let short_link = state.link_service.short_url(&link.short_code);

    let message = match outcome {
        DeactivationOutcome::Deactivated => format!("Link {short_link} successfully deactivated"),
        DeactivationOutcome::AlreadyInactive => format!("Link {short_link} is already deactivated"),
    };

    Ok(Json(MessageResponse { message }))
}
