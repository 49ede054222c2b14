// Application Layer - Use Cases and Business Logic

pub mod query;
pub mod relay;
pub mod submission;

// Re-exports
pub use query::QueryService;
pub use relay::{shutdown_channel, OutboxRelay, ShutdownSender, ShutdownToken};
pub use submission::SubmissionService;
