//! Link lifecycle: creation, resolution, expiry sweeps and owner deactivation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::domain::entities::{Identity, Link, LinkSummary, NewLink};
use crate::domain::lifetime::{Expiry, LifeTime};
use crate::domain::notification::Notification;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::queue::NotificationQueue;
use crate::utils::code_generator::generate_code;

/// A newly created link together with its public URL.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub link: Link,
    pub short_link: String,
}

/// Outcome of an owner-requested deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivationOutcome {
    Deactivated,
    AlreadyInactive,
}

/// Counters from one expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryReport {
    /// Matured active links returned by the scan.
    pub scanned: usize,
    /// Links this sweep flipped to inactive.
    pub deactivated: usize,
    /// Links another writer deactivated between scan and update.
    pub skipped: usize,
    /// Links whose update failed.
    pub failed: usize,
    pub notification_failures: usize,
}

/// Service owning every state transition of a link.
///
/// Transitions are conditional writes against the link store: a link only
/// leaves the active state once, and only the caller whose write applied sends
/// the deactivation notification. Notifications are enqueued after the write;
/// a failed enqueue is logged and counted but never undoes the transition.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    queue: Arc<dyn NotificationQueue>,
    base_url: String,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        queue: Arc<dyn NotificationQueue>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            links,
            queue,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates an active link for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `original_link` is not an absolute http(s) URL
    /// - `life_time` is not one of the known lifetimes
    ///
    /// Returns [`AppError::Conflict`] on the (negligible) short code collision.
    pub async fn create(
        &self,
        owner: &Identity,
        original_link: &str,
        life_time: &str,
    ) -> Result<CreatedLink, AppError> {
        let original_link = validate_original_link(original_link)?;
        let life_time: LifeTime = life_time.parse().map_err(|_| {
            AppError::bad_request(
                "Invalid life time",
                json!({
                    "value": life_time,
                    "allowed": LifeTime::ALL.map(LifeTime::as_str),
                }),
            )
        })?;

        let short_code = generate_code().map_err(|e| {
            error!(error = %e, "OS random generator failed");
            AppError::internal("Failed to generate short code", json!({}))
        })?;

        let now = Utc::now();
        let link = self
            .links
            .create(NewLink {
                link_id: Uuid::new_v4(),
                short_code,
                original_link,
                expiry: life_time.expiry_from(now),
                created_at: now,
                owner_id: owner.user_id,
                owner_email: owner.email.clone(),
            })
            .await?;

        metrics::counter!("links_created_total").increment(1);
        info!(
            link_id = %link.link_id,
            owner_id = %link.owner_id,
            life_time = %life_time,
            "Link created"
        );

        Ok(CreatedLink {
            short_link: self.short_url(&link.short_code),
            link,
        })
    }

    /// Resolves a visit to `short_code` and returns the destination.
    ///
    /// Single-use links are deactivated by the visit; deadline links count the
    /// click. A missing, inactive or past-deadline link is reported as not
    /// found without revealing which.
    pub async fn resolve(&self, short_code: &str) -> Result<String, AppError> {
        let link = self
            .links
            .find_by_short_code(short_code)
            .await?
            .filter(|link| link.is_active)
            .ok_or_else(link_not_found)?;

        match link.expiry {
            Expiry::OnFirstVisit => {
                if !self.links.deactivate(link.link_id).await? {
                    return Err(link_not_found());
                }
                self.notify_deactivated(&link).await;
            }
            Expiry::At(deadline) => {
                // Left for the sweep, which deactivates and notifies
                if deadline <= Utc::now() {
                    return Err(link_not_found());
                }
                if !self.links.increment_clicks(link.link_id).await? {
                    return Err(link_not_found());
                }
            }
        }

        metrics::counter!("links_resolved_total").increment(1);
        Ok(link.original_link)
    }

    /// Deactivates every active link whose deadline is at or before `now`.
    ///
    /// # Errors
    ///
    /// Only a failure of the initial scan is returned. Per-link failures are
    /// logged and counted in the report.
    pub async fn expire_matured(&self, now: DateTime<Utc>) -> Result<ExpiryReport, AppError> {
        let matured = self.links.find_matured(now).await?;
        let mut report = ExpiryReport {
            scanned: matured.len(),
            ..ExpiryReport::default()
        };

        for link in &matured {
            match self.links.deactivate(link.link_id).await {
                Ok(true) => {
                    report.deactivated += 1;
                    if !self.notify_deactivated(link).await {
                        report.notification_failures += 1;
                    }
                }
                Ok(false) => report.skipped += 1,
                Err(e) => {
                    warn!(link_id = %link.link_id, error = %e, "Failed to deactivate matured link");
                    report.failed += 1;
                }
            }
        }

        metrics::counter!("links_expired_total").increment(report.deactivated as u64);
        Ok(report)
    }

    /// Lists the caller's links.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<LinkSummary>, AppError> {
        let links = self.links.list_by_owner(owner_id).await?;

        Ok(links
            .into_iter()
            .map(|link| LinkSummary {
                short_link: self.short_url(&link.short_code),
                clicks: link.clicks,
                is_active: link.is_active,
            })
            .collect())
    }

    /// Deactivates a link on behalf of its owner. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or belongs to
    /// someone else.
    pub async fn deactivate(
        &self,
        owner_id: Uuid,
        link_id: Uuid,
    ) -> Result<(Link, DeactivationOutcome), AppError> {
        let link = self
            .links
            .find_by_id(link_id)
            .await?
            .filter(|link| link.owner_id == owner_id)
            .ok_or_else(|| {
                AppError::not_found("Link not found or access denied", json!({ "linkId": link_id }))
            })?;

        if !link.is_active || !self.links.deactivate(link.link_id).await? {
            return Ok((link, DeactivationOutcome::AlreadyInactive));
        }

        self.notify_deactivated(&link).await;
        info!(link_id = %link.link_id, "Link deactivated by owner");

        Ok((link, DeactivationOutcome::Deactivated))
    }

    /// Builds the public URL for a short code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    /// Checks link store connectivity.
    pub async fn ping_store(&self) -> Result<(), AppError> {
        self.links.ping().await
    }

    /// Enqueues the deactivation email. Returns false if the enqueue failed.
    async fn notify_deactivated(&self, link: &Link) -> bool {
        let notification = Notification::link_deactivated(
            &link.owner_email,
            &self.short_url(&link.short_code),
            &link.original_link,
        );

        match self.queue.enqueue(&notification).await {
            Ok(()) => {
                metrics::counter!("notifications_enqueued_total").increment(1);
                true
            }
            Err(e) => {
                metrics::counter!("notifications_failed_total").increment(1);
                error!(
                    link_id = %link.link_id,
                    backend = self.queue.backend(),
                    error = %e,
                    "Failed to enqueue deactivation notification"
                );
                false
            }
        }
    }
}

fn link_not_found() -> AppError {
    AppError::not_found("Link not found", json!({}))
}

fn validate_original_link(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    let invalid = |reason: &str| {
        AppError::bad_request("Invalid URL format", json!({ "reason": reason }))
    };

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(trimmed.to_string())
}
