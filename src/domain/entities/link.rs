//! Link entity representing a shortened URL with an expiry policy.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::lifetime::Expiry;

/// A shortened URL owned by a registered user.
///
/// Once `is_active` is false the link is terminal: nothing reactivates it and
/// it never resolves again.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub link_id: Uuid,
    pub short_code: String,
    pub original_link: String,
    pub clicks: i64,
    pub expiry: Expiry,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_email: String,
}

impl Link {
    /// Builds a fresh, active link with no clicks.
    pub fn from_new(new_link: NewLink) -> Self {
        Self {
            link_id: new_link.link_id,
            short_code: new_link.short_code,
            original_link: new_link.original_link,
            clicks: 0,
            expiry: new_link.expiry,
            is_active: true,
            created_at: new_link.created_at,
            owner_id: new_link.owner_id,
            owner_email: new_link.owner_email,
        }
    }

    /// True if the link is single use.
    pub fn is_single_use(&self) -> bool {
        matches!(self.expiry, Expiry::OnFirstVisit)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub link_id: Uuid,
    pub short_code: String,
    pub original_link: String,
    pub expiry: Expiry,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_email: String,
}

/// Public view of a link returned to its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSummary {
    pub short_link: String,
    pub clicks: i64,
    pub is_active: bool,
}
