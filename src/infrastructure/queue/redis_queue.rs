//! Redis-backed notification queue.

use super::service::{NotificationQueue, QueueError, QueueResult};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

use crate::domain::notification::Notification;

/// Queue stored in a Redis list.
///
/// Producers `LPUSH` JSON messages, the worker `RPOP`s them, so the list is
/// consumed oldest first. Uses `ConnectionManager` for automatic reconnects.
pub struct RedisQueue {
    conn: ConnectionManager,
    key: String,
}

impl RedisQueue {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key` - List key holding the queue (`NOTIFICATION_QUEUE`)
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, key: &str) -> QueueResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            QueueError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            QueueError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| QueueError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis, notification queue key '{}'", key);

        Ok(Self {
            conn: manager,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl NotificationQueue for RedisQueue {
    async fn enqueue(&self, notification: &Notification) -> QueueResult<()> {
        let payload = serde_json::to_string(notification)?;
        let mut conn = self.conn.clone();

        conn.lpush::<_, _, ()>(&self.key, payload)
            .await
            .map_err(|e| QueueError::OperationError(e.to_string()))
    }

    async fn dequeue(&self, wait: Duration) -> QueueResult<Option<Notification>> {
        let mut conn = self.conn.clone();

        let popped: Option<String> = conn
            .rpop(&self.key, None)
            .await
            .map_err(|e| QueueError::OperationError(e.to_string()))?;

        match popped {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => {
                tokio::time::sleep(wait).await;
                Ok(None)
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
