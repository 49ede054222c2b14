// Submit Use Case

use crate::domain::{defaults, task, NewOutboxMessage, QueueMessage, Task, DEFAULT_QUEUE};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, TimeProvider, TransactionalTaskRepository};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Submit request: one required `url`, optional per-field overrides of the
/// default generation bundle. A client-supplied status is never honored;
/// submission always creates `pending` rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub url: String,

    #[serde(default)]
    pub script_prompt: Option<String>,
    #[serde(default)]
    pub prompt_text_speaker1: Option<String>,
    #[serde(default)]
    pub prompt_text_speaker2: Option<String>,
    #[serde(default)]
    pub prompt_audio_speaker1: Option<String>,
    #[serde(default)]
    pub prompt_audio_speaker2: Option<String>,
}

/// Confirmation returned to the caller; carries the full created row so the
/// caller can display or link to it.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub task: Task,
}

/// Execute the submit use case.
///
/// The task row and its outbox message are written in one transaction: a
/// failure at any step leaves the store untouched, and a committed task is
/// guaranteed a queue message once the relay drains the outbox. No retries;
/// every failure is terminal and surfaced once.
pub async fn execute(
    task_repo: &dyn TransactionalTaskRepository,
    id_provider: &dyn IdProvider,
    time_provider: &dyn TimeProvider,
    req: SubmitRequest,
) -> Result<SubmitReceipt> {
    // Validate before any side effect
    task::validate_url(&req.url)?;

    let id = id_provider.generate_id();
    if id.is_empty() {
        return Err(AppError::Internal(
            "generated task id is empty".to_string(),
        ));
    }
    let created_at = time_provider.now_millis();

    let mut task = Task::new(id, created_at, req.url.trim(), &defaults::default_bundle());
    apply_overrides(&mut task, &req);

    let message = QueueMessage::for_task(&task);
    let payload = serde_json::to_value(&message)?;

    let mut tx = task_repo.begin_transaction().await?;
    tx.insert_task(&task).await?;
    tx.insert_outbox(&NewOutboxMessage {
        task_id: task.id.clone(),
        queue: DEFAULT_QUEUE.to_string(),
        payload,
        created_at,
    })
    .await?;
    tx.commit().await?;

    info!(task_id = %task.id, url = %task.url, "task submitted");

    Ok(SubmitReceipt { task })
}

fn apply_overrides(task: &mut Task, req: &SubmitRequest) {
    if req.script_prompt.is_some() {
        task.script_prompt = req.script_prompt.clone();
    }
    if req.prompt_text_speaker1.is_some() {
        task.prompt_text_speaker1 = req.prompt_text_speaker1.clone();
    }
    if req.prompt_text_speaker2.is_some() {
        task.prompt_text_speaker2 = req.prompt_text_speaker2.clone();
    }
    if req.prompt_audio_speaker1.is_some() {
        task.prompt_audio_speaker1 = req.prompt_audio_speaker1.clone();
    }
    if req.prompt_audio_speaker2.is_some() {
        task.prompt_audio_speaker2 = req.prompt_audio_speaker2.clone();
    }
}
