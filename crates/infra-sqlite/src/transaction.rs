// SQLite Transaction Implementation

use crate::task_repository::map_sqlx_error;
use async_trait::async_trait;
use podgen_core::domain::{NewOutboxMessage, Task};
use podgen_core::error::Result;
use podgen_core::port::{TaskStoreTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

pub struct SqliteTaskTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteTaskTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteTaskTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl TaskStoreTransaction for SqliteTaskTransaction<'_> {
    async fn insert_task(&mut self, task: &Task) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (
                id, url,
                script_prompt, prompt_text_speaker1, prompt_text_speaker2,
                prompt_audio_speaker1, prompt_audio_speaker2,
                status, created_at, result_url, script
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.id)
        .bind(&task.url)
        .bind(&task.script_prompt)
        .bind(&task.prompt_text_speaker1)
        .bind(&task.prompt_text_speaker2)
        .bind(&task.prompt_audio_speaker1)
        .bind(&task.prompt_audio_speaker2)
        .bind(task.status.to_string())
        .bind(task.created_at)
        .bind(&task.result_url)
        .bind(&task.script)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_outbox(&mut self, message: &NewOutboxMessage) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO task_outbox (task_id, queue, payload, created_at, dispatched_at)
            VALUES (?, ?, ?, ?, NULL)
            "#,
        )
        .bind(&message.task_id)
        .bind(&message.queue)
        .bind(message.payload.to_string())
        .bind(message.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations, SqliteTaskRepository};
    use podgen_core::domain::defaults::default_bundle;
    use podgen_core::port::{TaskRepository, TransactionalTaskRepository};
    use serde_json::json;

    fn outbox_row(task_id: &str) -> NewOutboxMessage {
        NewOutboxMessage {
            task_id: task_id.to_string(),
            queue: "moss_ttsd".to_string(),
            payload: json!({"type": "ttsd", "id": task_id}),
            created_at: 1000,
        }
    }

    #[tokio::test]
    async fn committed_transaction_persists_task_and_outbox() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteTaskRepository::new(pool.clone());

        let task = Task::new("t-1", 1000, "https://example.com", &default_bundle());
        let mut tx = repo.begin_transaction().await.unwrap();
        tx.insert_task(&task).await.unwrap();
        tx.insert_outbox(&outbox_row("t-1")).await.unwrap();
        tx.commit().await.unwrap();

        assert!(repo.find_by_id("t-1").await.unwrap().is_some());
        let outbox_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task_outbox")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(outbox_count, 1);
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_rows() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqliteTaskRepository::new(pool.clone());

        let task = Task::new("t-1", 1000, "https://example.com", &default_bundle());
        let mut tx = repo.begin_transaction().await.unwrap();
        tx.insert_task(&task).await.unwrap();
        tx.insert_outbox(&outbox_row("t-1")).await.unwrap();
        tx.rollback().await.unwrap();

        assert!(repo.find_by_id("t-1").await.unwrap().is_none());
        let outbox_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM task_outbox")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(outbox_count, 0);
    }
}
