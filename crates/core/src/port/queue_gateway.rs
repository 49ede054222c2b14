// Queue Gateway Port (Interface)

use crate::error::Result;
use async_trait::async_trait;

/// Send-only interface to the message broker.
///
/// Fire-and-forget from the caller's perspective: a returned message id
/// acknowledges acceptance by the queue, never processing.
#[async_trait]
pub trait QueueGateway: Send + Sync {
    /// Hand `payload` to the named queue, optionally delayed by whole
    /// seconds. Returns the queue-assigned message id.
    async fn enqueue(
        &self,
        payload: &serde_json::Value,
        queue: &str,
        delay_seconds: i64,
    ) -> Result<i64>;
}
