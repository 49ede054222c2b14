// Task Repository Port (Interface)

use crate::domain::{Task, TaskStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Status filter for task queries. `All` means no status predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Is(TaskStatus),
}

/// Inclusive, zero-indexed row range for pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub from: i64,
    pub to: i64,
}

impl PageRange {
    /// LIMIT/OFFSET equivalent of the inclusive range. Inverted or negative
    /// ranges clamp to an empty slice instead of erroring.
    pub fn limit_offset(&self) -> (i64, i64) {
        let offset = self.from.max(0);
        let limit = (self.to - offset + 1).max(0);
        (limit, offset)
    }
}

/// Filtered, paginated task query. All predicates apply inside one store
/// query, so `total` is always consistent with the returned slice.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    /// Exact-match on task id.
    pub id: Option<String>,
    /// Status predicate (deprecated spellings expand at the store layer).
    pub status: StatusFilter,
    /// Row range; None returns all matching rows.
    pub range: Option<PageRange>,
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct TaskPage {
    /// Matching rows, `created_at` descending, at most the requested range.
    pub tasks: Vec<Task>,
    /// Exact count of rows matching the filters before range slicing.
    pub total: i64,
}

/// Repository interface for Task persistence
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task row.
    async fn insert(&self, task: &Task) -> Result<()>;

    /// Find a task by id. `None` is "not found", distinct from a store error.
    async fn find_by_id(&self, id: &str) -> Result<Option<Task>>;

    /// Filtered, paginated read, ordered by `created_at` descending.
    async fn query(&self, query: &TaskQuery) -> Result<TaskPage>;

    /// Count rows in one status without materializing them.
    async fn count_by_status(&self, status: TaskStatus) -> Result<i64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_range_maps_to_limit_offset() {
        assert_eq!(PageRange { from: 0, to: 9 }.limit_offset(), (10, 0));
        assert_eq!(PageRange { from: 10, to: 19 }.limit_offset(), (10, 10));
        assert_eq!(PageRange { from: 5, to: 5 }.limit_offset(), (1, 5));
    }

    #[test]
    fn page_range_clamps_degenerate_input() {
        assert_eq!(PageRange { from: 9, to: 0 }.limit_offset(), (0, 9));
        assert_eq!(PageRange { from: -3, to: 4 }.limit_offset(), (5, 0));
    }
}
