//! Handlers for account registration and sign-in.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::auth::{CredentialsRequest, SignInResponse, SignUpResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers an account and returns its first session token.
///
/// # Endpoint
///
/// `POST /auth/signup`
///
/// # Errors
///
/// - `400` if the email or password fails validation
/// - `409` if the email is already registered
pub async fn sign_up_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignUpResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let signed_up = state
        .account_service
        .sign_up(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "You are registered. Please login.".to_string(),
            jwe: signed_up.token.token,
        }),
    ))
}

/// Exchanges credentials for a new session token.
///
/// # Endpoint
///
/// `POST /auth/signin`
///
/// # Response
///
/// ```json
/// {
///   "message": "Sign in successful",
///   "token": { "tokenId": "...", "token": "<JWE>", "createdAt": "..." }
/// }
/// ```
///
/// The previous token of the user stops being listed in the token store.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SignInResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .account_service
        .sign_in(&payload.email, &payload.password)
        .await?;

    Ok(Json(SignInResponse {
        message: "Sign in successful".to_string(),
        token,
    }))
}
