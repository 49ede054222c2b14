// Domain Layer - Pure business logic and entities

pub mod defaults;
pub mod error;
pub mod message;
pub mod outbox;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use message::{QueueMessage, DEFAULT_QUEUE, TASK_TYPE_TTSD};
pub use outbox::{NewOutboxMessage, OutboxMessage};
pub use task::{PromptBundle, SpeakerProfile, Task, TaskId, TaskStatus};
