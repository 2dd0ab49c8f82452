//! DTOs for link endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::LinkSummary;
use crate::domain::lifetime::LifeTime;

/// Request to create a short link.
///
/// Missing fields deserialize as empty strings so that they are reported by
/// validation alongside any other field errors.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[serde(default)]
    #[validate(url(message = "Link should be a valid URL."))]
    pub original_link: String,

    #[serde(default)]
    #[validate(custom(function = "validate_life_time"))]
    pub life_time: String,
}

fn validate_life_time(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new("required").with_message("Life time is required.".into()));
    }
    if value.parse::<LifeTime>().is_err() {
        return Err(ValidationError::new("life_time").with_message(
            "Life time must be one of the following values: 'AFTER_THE_LINK', '1_DAY', '3_DAYS', '7_DAYS'."
                .into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub message: String,
    pub short_link: String,
}

#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkItem>,
}

/// One link in the owner's listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    pub short_link: String,
    pub clicks: i64,
    pub is_active: bool,
}

impl From<LinkSummary> for LinkItem {
    fn from(summary: LinkSummary) -> Self {
        Self {
            short_link: summary.short_link,
            clicks: summary.clicks,
            is_active: summary.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Destination returned to a visitor.
#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub link: String,
}
