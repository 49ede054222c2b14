// SQLite TaskRepository Implementation

use crate::SqliteTaskTransaction;
use async_trait::async_trait;
use podgen_core::domain::{Task, TaskStatus};
use podgen_core::error::{AppError, Result};
use podgen_core::port::{
    StatusFilter, TaskPage, TaskQuery, TaskRepository, TaskStoreTransaction,
    TransactionalTaskRepository,
};
use sqlx::SqlitePool;

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Database(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "787" | "3850" => AppError::Database(format!(
                        "Foreign key constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => AppError::Database(format!("Column not found: {}", col)),
        _ => AppError::Database(err.to_string()),
    }
}

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// WHERE fragment for a query's filters; bind order is id first, then the
/// status spellings.
fn filter_clause(query: &TaskQuery) -> String {
    let mut conditions: Vec<String> = Vec::new();
    if query.id.is_some() {
        conditions.push("id = ?".to_string());
    }
    if let StatusFilter::Is(status) = query.status {
        let placeholders = vec!["?"; status.storage_values().len()].join(", ");
        conditions.push(format!("status IN ({})", placeholders));
    }
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn insert(&self, task: &Task) -> Result<()> {
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
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Task>> {
        let row = sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(|r| r.into_task()))
    }

    async fn query(&self, query: &TaskQuery) -> Result<TaskPage> {
        let filter = filter_clause(query);

        // Exact count of matching rows, before range slicing
        let count_sql = format!("SELECT COUNT(*) FROM tasks{}", filter);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(id) = &query.id {
            count_query = count_query.bind(id);
        }
        if let StatusFilter::Is(status) = query.status {
            for value in status.storage_values() {
                count_query = count_query.bind(*value);
            }
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        // Sliced rows from the same filtered query, newest first
        let mut select_sql = format!(
            "SELECT * FROM tasks{} ORDER BY created_at DESC, id ASC",
            filter
        );
        if query.range.is_some() {
            select_sql.push_str(" LIMIT ? OFFSET ?");
        }
        let mut select_query = sqlx::query_as::<_, TaskRow>(&select_sql);
        if let Some(id) = &query.id {
            select_query = select_query.bind(id);
        }
        if let StatusFilter::Is(status) = query.status {
            for value in status.storage_values() {
                select_query = select_query.bind(*value);
            }
        }
        if let Some(range) = query.range {
            let (limit, offset) = range.limit_offset();
            select_query = select_query.bind(limit).bind(offset);
        }
        let rows = select_query
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(TaskPage {
            tasks: rows.into_iter().map(|r| r.into_task()).collect(),
            total,
        })
    }

    async fn count_by_status(&self, status: TaskStatus) -> Result<i64> {
        let placeholders = vec!["?"; status.storage_values().len()].join(", ");
        let sql = format!("SELECT COUNT(*) FROM tasks WHERE status IN ({})", placeholders);

        let mut count_query = sqlx::query_scalar::<_, i64>(&sql);
        for value in status.storage_values() {
            count_query = count_query.bind(*value);
        }

        count_query
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl TransactionalTaskRepository for SqliteTaskRepository {
    async fn begin_transaction(&self) -> Result<Box<dyn TaskStoreTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteTaskTransaction::new(tx)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct TaskRow {
    id: String,
    url: String,
    script_prompt: Option<String>,
    prompt_text_speaker1: Option<String>,
    prompt_text_speaker2: Option<String>,
    prompt_audio_speaker1: Option<String>,
    prompt_audio_speaker2: Option<String>,
    status: String,
    created_at: i64,
    result_url: Option<String>,
    script: Option<String>,
}

impl TaskRow {
    fn into_task(self) -> Task {
        let status = match self.status.as_str() {
            "pending" => TaskStatus::Pending,
            "processing" => TaskStatus::Processing,
            "completed" | "done" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            other => {
                // An unrecognized status can only come from a misbehaving
                // worker; surface the row as failed rather than dropping it.
                tracing::warn!(task_id = %self.id, status = other, "unknown task status in store");
                TaskStatus::Failed
            }
        };

        Task {
            id: self.id,
            url: self.url,
            script_prompt: self.script_prompt,
            prompt_text_speaker1: self.prompt_text_speaker1,
            prompt_text_speaker2: self.prompt_text_speaker2,
            prompt_audio_speaker1: self.prompt_audio_speaker1,
            prompt_audio_speaker2: self.prompt_audio_speaker2,
            status,
            created_at: self.created_at,
            result_url: self.result_url,
            script: self.script,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use podgen_core::domain::defaults::default_bundle;
    use podgen_core::port::PageRange;

    async fn repo() -> SqliteTaskRepository {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteTaskRepository::new(pool)
    }

    fn task(id: &str, created_at: i64) -> Task {
        Task::new(id, created_at, "https://example.com/a", &default_bundle())
    }

    #[tokio::test]
    async fn insert_then_find_round_trips_all_fields() {
        let repo = repo().await;
        let original = task("t-1", 1000);
        repo.insert(&original).await.unwrap();

        let fetched = repo.find_by_id("t-1").await.unwrap().unwrap();
        assert_eq!(fetched.url, original.url);
        assert_eq!(fetched.script_prompt, original.script_prompt);
        assert_eq!(fetched.prompt_audio_speaker1, original.prompt_audio_speaker1);
        assert_eq!(fetched.prompt_text_speaker2, original.prompt_text_speaker2);
        assert_eq!(fetched.status, TaskStatus::Pending);
        assert_eq!(fetched.created_at, 1000);
        assert!(fetched.result_url.is_none());
    }

    #[tokio::test]
    async fn find_by_id_returns_none_for_missing_row() {
        let repo = repo().await;
        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_is_a_database_error() {
        let repo = repo().await;
        repo.insert(&task("t-1", 1)).await.unwrap();
        let err = repo.insert(&task("t-1", 2)).await.unwrap_err();
        assert!(err.to_string().contains("constraint"));
    }

    #[tokio::test]
    async fn query_orders_newest_first_and_slices() {
        let repo = repo().await;
        for i in 0..25 {
            repo.insert(&task(&format!("t-{:02}", i), 1000 + i)).await.unwrap();
        }

        let page = repo
            .query(&TaskQuery {
                range: Some(PageRange { from: 0, to: 9 }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.tasks.len(), 10);
        assert_eq!(page.tasks[0].id, "t-24"); // newest first
        assert_eq!(page.tasks[9].id, "t-15");

        let second = repo
            .query(&TaskQuery {
                range: Some(PageRange { from: 10, to: 19 }),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second.total, 25);
        assert_eq!(second.tasks[0].id, "t-14");
    }

    #[tokio::test]
    async fn status_filter_applies_before_the_range() {
        let repo = repo().await;
        for i in 0..6 {
            let mut t = task(&format!("t-{}", i), 1000 + i);
            if i % 2 == 0 {
                t.status = TaskStatus::Completed;
            }
            repo.insert(&t).await.unwrap();
        }

        // Only 3 pending rows exist; the range covers all of them and total
        // matches the filtered count, not the table size.
        let page = repo
            .query(&TaskQuery {
                status: StatusFilter::Is(TaskStatus::Pending),
                range: Some(PageRange { from: 0, to: 9 }),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.tasks.len(), 3);
        assert!(page.tasks.iter().all(|t| t.status == TaskStatus::Pending));
    }

    #[tokio::test]
    async fn completed_filter_matches_legacy_done_rows() {
        let repo = repo().await;
        repo.insert(&task("t-1", 1)).await.unwrap();
        // Simulate an old worker writing the deprecated spelling
        sqlx::query("UPDATE tasks SET status = 'done' WHERE id = 't-1'")
            .execute(&repo.pool)
            .await
            .unwrap();

        let page = repo
            .query(&TaskQuery {
                status: StatusFilter::Is(TaskStatus::Completed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.tasks[0].status, TaskStatus::Completed);

        assert_eq!(repo.count_by_status(TaskStatus::Completed).await.unwrap(), 1);
        assert_eq!(repo.count_by_status(TaskStatus::Pending).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn id_filter_returns_list_shaped_result() {
        let repo = repo().await;
        repo.insert(&task("t-1", 1)).await.unwrap();
        repo.insert(&task("t-2", 2)).await.unwrap();

        let page = repo
            .query(&TaskQuery {
                id: Some("t-1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.tasks.len(), 1);
        assert_eq!(page.tasks[0].id, "t-1");

        let missing = repo
            .query(&TaskQuery {
                id: Some("absent".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(missing.total, 0);
        assert!(missing.tasks.is_empty());
    }
}
