//! In-process queue used when no Redis is configured.

use super::service::{NotificationQueue, QueueError, QueueResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::domain::notification::Notification;

/// A bounded in-memory queue.
///
/// Messages live only as long as the process. Suitable for development and
/// single-instance deployments; use [`super::RedisQueue`] otherwise.
pub struct ChannelQueue {
    tx: mpsc::Sender<Notification>,
    rx: Mutex<mpsc::Receiver<Notification>>,
}

impl ChannelQueue {
    /// Creates a queue holding at most `capacity` pending messages.
    pub fn new(capacity: usize) -> Self {
        debug!("Using in-process notification queue (capacity {})", capacity);
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Number of messages waiting to be consumed.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}

#[async_trait]
impl NotificationQueue for ChannelQueue {
    async fn enqueue(&self, notification: &Notification) -> QueueResult<()> {
        self.tx
            .try_send(notification.clone())
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => QueueError::Full,
                mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
            })
    }

    async fn dequeue(&self, wait: Duration) -> QueueResult<Option<Notification>> {
        let mut rx = self.rx.lock().await;

        match tokio::time::timeout(wait, rx.recv()).await {
            Ok(Some(notification)) => Ok(Some(notification)),
            Ok(None) => Err(QueueError::Closed),
            Err(_) => Ok(None),
        }
    }

    async fn health_check(&self) -> bool {
        !self.tx.is_closed()
    }

    fn backend(&self) -> &'static str {
        "in-process"
    }
}
