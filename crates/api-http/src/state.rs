// Shared handler state (dependency-injected services, no singletons)

use podgen_core::application::{QueryService, SubmissionService};
use podgen_core::port::QueueGateway;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub submission: Arc<SubmissionService>,
    pub query: Arc<QueryService>,
    pub queue: Arc<dyn QueueGateway>,
}

impl AppState {
    pub fn new(
        submission: Arc<SubmissionService>,
        query: Arc<QueryService>,
        queue: Arc<dyn QueueGateway>,
    ) -> Self {
        Self {
            submission,
            query,
            queue,
        }
    }
}
