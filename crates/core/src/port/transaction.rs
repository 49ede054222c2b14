// Transaction port for atomic operations

use crate::domain::{NewOutboxMessage, Task};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Store operations that can open transactions
#[async_trait]
pub trait TransactionalTaskRepository: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn TaskStoreTransaction>>;
}

/// Task store operations within a transaction.
///
/// The submission path needs exactly these two writes to be atomic: the task
/// row and its outbox message either both land or neither does.
#[async_trait]
pub trait TaskStoreTransaction: Transaction {
    /// Insert a task row (within transaction)
    async fn insert_task(&mut self, task: &Task) -> Result<()>;

    /// Insert an outbox row (within transaction)
    async fn insert_outbox(&mut self, message: &NewOutboxMessage) -> Result<()>;
}
