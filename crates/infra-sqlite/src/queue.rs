// SQLite Message Queue Implementation
//
// Table-backed queue in the style of pgmq: a send appends a row with a
// visibility timestamp; consumers (the external worker) read rows once
// visible. This system only ever sends.

use crate::task_repository::map_sqlx_error;
use async_trait::async_trait;
use podgen_core::error::Result;
use podgen_core::port::{QueueGateway, TimeProvider};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;

pub struct SqliteMessageQueue {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteMessageQueue {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl QueueGateway for SqliteMessageQueue {
    async fn enqueue(
        &self,
        payload: &serde_json::Value,
        queue: &str,
        delay_seconds: i64,
    ) -> Result<i64> {
        let now = self.time_provider.now_millis();
        let visible_at = now + delay_seconds.max(0) * 1000;

        let result = sqlx::query(
            r#"
            INSERT INTO queue_messages (queue, payload, enqueued_at, visible_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(queue)
        .bind(payload.to_string())
        .bind(now)
        .bind(visible_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let msg_id = result.last_insert_rowid();
        debug!(queue, msg_id, "message accepted");
        Ok(msg_id)
    }
}
