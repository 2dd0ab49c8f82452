//! Notification queue consumer.

use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, warn};

use crate::domain::notification::Notification;
use crate::infrastructure::mail::Mailer;
use crate::infrastructure::queue::NotificationQueue;

/// Retries after the first failed send.
pub const MAX_RETRIES: usize = 3;

/// Sends one notification, retrying with jittered exponential backoff.
///
/// Returns false if the message was dropped after the last retry.
pub async fn deliver(mailer: &dyn Mailer, notification: &Notification) -> bool {
    // 100ms, 200ms, 400ms before jitter
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(50)
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::spawn(strategy, || mailer.send(notification)).await {
        Ok(()) => {
            metrics::counter!("emails_sent_total").increment(1);
            debug!(to = %notification.recipient, "Notification delivered");
            true
        }
        Err(e) => {
            metrics::counter!("emails_dropped_total").increment(1);
            error!(
                to = %notification.recipient,
                subject = %notification.subject,
                error = %e,
                "Dropping notification after retries"
            );
            false
        }
    }
}

/// Consumes the queue until the task is aborted.
///
/// `idle_wait` bounds each dequeue and is also the back-off after a queue
/// error.
pub async fn run_mail_worker(
    queue: Arc<dyn NotificationQueue>,
    mailer: Arc<dyn Mailer>,
    idle_wait: Duration,
) {
    loop {
        match queue.dequeue(idle_wait).await {
            Ok(Some(notification)) => {
                deliver(mailer.as_ref(), &notification).await;
            }
            Ok(None) => {}
            Err(e) => {
                warn!(backend = queue.backend(), error = %e, "Notification queue error");
                tokio::time::sleep(idle_wait).await;
            }
        }
    }
}
