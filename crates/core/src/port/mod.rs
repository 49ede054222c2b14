// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod outbox_repository;
pub mod queue_gateway;
pub mod task_repository;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use id_provider::IdProvider;
pub use outbox_repository::OutboxRepository;
pub use queue_gateway::QueueGateway;
pub use task_repository::{PageRange, StatusFilter, TaskPage, TaskQuery, TaskRepository};
pub use time_provider::TimeProvider;
pub use transaction::{TaskStoreTransaction, Transaction, TransactionalTaskRepository};
