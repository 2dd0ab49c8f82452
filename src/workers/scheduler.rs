//! Periodic jobs.

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::application::services::{LinkService, SessionService};

/// Runs [`LinkService::expire_matured`] every `every` until aborted.
pub async fn run_link_expiry_job(links: Arc<LinkService>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match links.expire_matured(Utc::now()).await {
            Ok(report) if report.scanned > 0 => info!(
                scanned = report.scanned,
                deactivated = report.deactivated,
                skipped = report.skipped,
                failed = report.failed,
                notification_failures = report.notification_failures,
                "Expiry sweep finished"
            ),
            Ok(_) => {}
            Err(e) => error!(error = %e, "Expiry sweep failed"),
        }
    }
}

/// Runs [`SessionService::purge_stale`] every `every` until aborted.
pub async fn run_token_cleanup_job(sessions: Arc<SessionService>, every: Duration) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match sessions.purge_stale(Utc::now()).await {
            Ok(0) => {}
            Ok(removed) => info!(removed, "Removed stale session tokens"),
            Err(e) => error!(error = %e, "Token cleanup failed"),
        }
    }
}
