//! Shared helpers for the integration test suites

use async_trait::async_trait;
use podgen_api_http::{build_router, AppState};
use podgen_core::application::{OutboxRelay, QueryService, SubmissionService};
use podgen_core::error::{AppError, Result};
use podgen_core::port::id_provider::UuidProvider;
use podgen_core::port::{QueueGateway, TimeProvider};
use podgen_infra_sqlite::{
    create_pool, run_migrations, SqliteMessageQueue, SqliteOutboxRepository, SqliteTaskRepository,
};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Deterministic clock: every reading advances by one second, so rows
/// created in sequence always have distinct, increasing timestamps.
pub struct TickingClock {
    now: AtomicI64,
}

impl TickingClock {
    pub fn starting_at(ms: i64) -> Self {
        Self {
            now: AtomicI64::new(ms),
        }
    }
}

impl TimeProvider for TickingClock {
    fn now_millis(&self) -> i64 {
        self.now.fetch_add(1000, Ordering::SeqCst)
    }
}

/// Queue gateway that rejects every send, for exercising relay failure paths.
pub struct FailingQueue;

#[async_trait]
impl QueueGateway for FailingQueue {
    async fn enqueue(
        &self,
        _payload: &serde_json::Value,
        _queue: &str,
        _delay_seconds: i64,
    ) -> Result<i64> {
        Err(AppError::Queue("queue unavailable".to_string()))
    }
}

/// Fully wired stack over one SQLite database.
pub struct TestHarness {
    pub pool: SqlitePool,
    pub clock: Arc<TickingClock>,
    pub task_repo: Arc<SqliteTaskRepository>,
    pub outbox_repo: Arc<SqliteOutboxRepository>,
    pub queue: Arc<SqliteMessageQueue>,
    pub submission: Arc<SubmissionService>,
    pub query: Arc<QueryService>,
}

impl TestHarness {
    pub async fn in_memory() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        Self::over_pool(pool).await
    }

    /// Wire the full stack over an existing pool (migrations included).
    pub async fn over_pool(pool: SqlitePool) -> Self {
        run_migrations(&pool).await.unwrap();

        let clock = Arc::new(TickingClock::starting_at(1_700_000_000_000));
        let task_repo = Arc::new(SqliteTaskRepository::new(pool.clone()));
        let outbox_repo = Arc::new(SqliteOutboxRepository::new(pool.clone()));
        let queue = Arc::new(SqliteMessageQueue::new(pool.clone(), clock.clone()));
        let submission = Arc::new(SubmissionService::new(
            task_repo.clone(),
            Arc::new(UuidProvider),
            clock.clone(),
        ));
        let query = Arc::new(QueryService::new(task_repo.clone()));

        Self {
            pool,
            clock,
            task_repo,
            outbox_repo,
            queue,
            submission,
            query,
        }
    }

    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(
            self.submission.clone(),
            self.query.clone(),
            self.queue.clone(),
        ))
    }

    /// Relay wired to the real queue.
    pub fn relay(&self) -> OutboxRelay {
        OutboxRelay::new(self.outbox_repo.clone(), self.queue.clone(), self.clock.clone())
    }

    /// Relay wired to a queue that rejects every send.
    pub fn relay_with_broken_queue(&self) -> OutboxRelay {
        OutboxRelay::new(
            self.outbox_repo.clone(),
            Arc::new(FailingQueue),
            self.clock.clone(),
        )
    }

    pub async fn queue_message_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM queue_messages")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    pub async fn outbox_row_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM task_outbox")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
