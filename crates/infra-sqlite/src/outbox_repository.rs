// SQLite OutboxRepository Implementation

use crate::task_repository::map_sqlx_error;
use async_trait::async_trait;
use podgen_core::domain::OutboxMessage;
use podgen_core::error::{AppError, Result};
use podgen_core::port::OutboxRepository;
use sqlx::SqlitePool;

pub struct SqliteOutboxRepository {
    pool: SqlitePool,
}

impl SqliteOutboxRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OutboxRepository for SqliteOutboxRepository {
    async fn fetch_undispatched(&self, limit: i64) -> Result<Vec<OutboxMessage>> {
        let rows: Vec<OutboxRow> = sqlx::query_as(
            r#"
            SELECT * FROM task_outbox
            WHERE dispatched_at IS NULL
            ORDER BY created_at ASC, id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }

    async fn mark_dispatched(&self, id: i64, now_ms: i64) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE task_outbox
            SET dispatched_at = ?
            WHERE id = ? AND dispatched_at IS NULL
            "#,
        )
        .bind(now_ms)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "undispatched outbox row {}",
                id
            )));
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OutboxRow {
    id: i64,
    task_id: String,
    queue: String,
    payload: String,
    created_at: i64,
    dispatched_at: Option<i64>,
}

impl OutboxRow {
    fn into_message(self) -> OutboxMessage {
        let payload: serde_json::Value =
            serde_json::from_str(&self.payload).unwrap_or(serde_json::json!({}));

        OutboxMessage {
            id: self.id,
            task_id: self.task_id,
            queue: self.queue,
            payload,
            created_at: self.created_at,
            dispatched_at: self.dispatched_at,
        }
    }
}
