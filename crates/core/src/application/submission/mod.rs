// Submission Service - creates a task and its queue message atomically

pub mod submit;

pub use submit::{SubmitReceipt, SubmitRequest};

use crate::error::Result;
use crate::port::{IdProvider, TimeProvider, TransactionalTaskRepository};
use std::sync::Arc;

/// Submission Service
pub struct SubmissionService {
    task_repo: Arc<dyn TransactionalTaskRepository>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl SubmissionService {
    pub fn new(
        task_repo: Arc<dyn TransactionalTaskRepository>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            task_repo,
            id_provider,
            time_provider,
        }
    }

    /// Submit a new podcast-generation task.
    pub async fn submit(&self, req: SubmitRequest) -> Result<SubmitReceipt> {
        submit::execute(
            self.task_repo.as_ref(),
            self.id_provider.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }
}
