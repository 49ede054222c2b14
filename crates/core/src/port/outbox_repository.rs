// Outbox Repository Port (Interface)

use crate::domain::OutboxMessage;
use crate::error::Result;
use async_trait::async_trait;

/// Read/ack interface over the task outbox, used by the relay.
///
/// Rows are written only through `TaskStoreTransaction::insert_outbox`, in
/// the same transaction as the task row they announce.
#[async_trait]
pub trait OutboxRepository: Send + Sync {
    /// Undispatched rows, oldest first, at most `limit`.
    async fn fetch_undispatched(&self, limit: i64) -> Result<Vec<OutboxMessage>>;

    /// Stamp a row as handed to the queue.
    async fn mark_dispatched(&self, id: i64, now_ms: i64) -> Result<()>;
}
