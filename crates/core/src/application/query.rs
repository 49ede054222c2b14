// Query Service - filtered, paginated reads of task state

use crate::domain::{Task, TaskStatus};
use crate::error::{AppError, Result};
use crate::port::{TaskPage, TaskQuery, TaskRepository};
use std::sync::Arc;

/// Per-task wait estimate bounds, in minutes. Display-only heuristic with no
/// feedback loop to the actual queue.
const WAIT_MINUTES_PER_TASK: (i64, i64) = (3, 5);

/// Query Service
pub struct QueryService {
    task_repo: Arc<dyn TaskRepository>,
}

impl QueryService {
    pub fn new(task_repo: Arc<dyn TaskRepository>) -> Self {
        Self { task_repo }
    }

    /// Fetch exactly one task. A missing row is `NotFound`, never a store
    /// error and never an empty-result ambiguity.
    pub async fn get_by_id(&self, id: &str) -> Result<Task> {
        self.task_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("task {}", id)))
    }

    /// Paginated, optionally filtered listing, newest first. The status
    /// filter runs inside the same store query as the range, so the slice
    /// and `total` always agree.
    pub async fn list(&self, query: &TaskQuery) -> Result<TaskPage> {
        self.task_repo.query(query).await
    }

    /// Store-reported count for one status, no row materialization.
    pub async fn count_by_status(&self, status: TaskStatus) -> Result<i64> {
        self.task_repo.count_by_status(status).await
    }

    /// Estimated queue wait as (low, high) minutes for a given backlog.
    pub fn wait_estimate_minutes(pending: i64) -> (i64, i64) {
        let backlog = pending.max(0);
        (
            backlog * WAIT_MINUTES_PER_TASK.0,
            backlog * WAIT_MINUTES_PER_TASK.1,
        )
    }
}
