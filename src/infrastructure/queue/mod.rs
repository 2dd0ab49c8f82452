//! Notification queue between the link lifecycle and the email worker.
//!
//! Provides a [`NotificationQueue`] trait with two implementations:
//! - [`RedisQueue`] - Durable Redis list shared by every service instance
//! - [`ChannelQueue`] - Bounded in-process channel used when Redis is not configured

mod channel_queue;
mod redis_queue;
mod service;

pub use channel_queue::ChannelQueue;
pub use redis_queue::RedisQueue;
pub use service::{NotificationQueue, QueueError, QueueResult};

#[cfg(test)]
pub use service::MockNotificationQueue;
