// Podgen Infrastructure - SQLite Adapter
// Implements: TaskRepository, TransactionalTaskRepository, OutboxRepository,
// QueueGateway

mod connection;
mod migration;
mod outbox_repository;
mod queue;
mod task_repository;
mod transaction;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use outbox_repository::SqliteOutboxRepository;
pub use queue::SqliteMessageQueue;
pub use task_repository::SqliteTaskRepository;
pub use transaction::SqliteTaskTransaction;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
