//! DTOs for sign-up and sign-in.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::IssuedToken;

/// Email and password, shared by sign-up and sign-in.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(email(message = "Email should be a valid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

const PASSWORD_RULE: &str = "Password must be 3-20 characters long, include at least one uppercase letter, one lowercase letter, and one number.";

fn validate_password(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    let ok = (3..=20).contains(&len)
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_digit());

    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("password").with_message(PASSWORD_RULE.into()))
    }
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub message: String,
    #[serde(rename = "JWE")]
    pub jwe: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub message: String,
    pub token: IssuedToken,
}
