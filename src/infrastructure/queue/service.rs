//! Queue trait and error types.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::notification::Notification;

/// Errors that can occur during queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue connection error: {0}")]
    ConnectionError(String),
    #[error("Queue operation error: {0}")]
    OperationError(String),
    #[error("Malformed queue message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Queue is full")]
    Full,
    #[error("Queue is closed")]
    Closed,
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Asynchronous message channel consumed by the email worker.
///
/// Producers only enqueue; the worker is the only consumer. Delivery is
/// at-least-once from the producer's point of view: a successful `enqueue`
/// means the message is durable in the backend.
///
/// # Implementations
///
/// - [`crate::infrastructure::queue::RedisQueue`] - Redis list (`LPUSH`/`RPOP`)
/// - [`crate::infrastructure::queue::ChannelQueue`] - In-process `tokio::sync::mpsc`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Appends a message to the queue.
    async fn enqueue(&self, notification: &Notification) -> QueueResult<()>;

    /// Takes the oldest message, waiting up to `wait` when the queue is empty.
    ///
    /// Returns `Ok(None)` if nothing arrived in time.
    async fn dequeue(&self, wait: Duration) -> QueueResult<Option<Notification>>;

    /// Checks if the queue backend is reachable.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
