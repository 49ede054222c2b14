// Task Outbox Model
//
// The outbox makes the two-phase submission durable: the task row and the
// queue payload are written in one store transaction, and a background relay
// drains undispatched rows into the queue. Rows are kept (with a
// dispatched_at stamp) rather than deleted, so delivery is at-least-once.

use crate::domain::TaskId;
use serde::{Deserialize, Serialize};

/// A pending-or-dispatched outbox row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxMessage {
    /// Auto-incrementing primary key.
    pub id: i64,
    /// Task this message announces.
    pub task_id: TaskId,
    /// Target queue channel.
    pub queue: String,
    /// JSON payload to hand to the queue verbatim.
    pub payload: serde_json::Value,
    /// Epoch ms when the row was written (same transaction as the task).
    pub created_at: i64,
    /// Epoch ms when the relay handed the payload to the queue; None until
    /// then.
    pub dispatched_at: Option<i64>,
}

/// Fields for creating a new outbox row; `id` is store-assigned and
/// `dispatched_at` starts empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOutboxMessage {
    pub task_id: TaskId,
    pub queue: String,
    pub payload: serde_json::Value,
    pub created_at: i64,
}
