// HTTP Handlers

use crate::error::ApiError;
use crate::state::AppState;
use crate::types::{
    project_fields, CreateTaskBody, EnqueueBody, EnqueueResponseBody, EnqueueResult, TaskBody,
    TaskListBody, TaskListParams,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use podgen_core::application::submission::SubmitRequest;
use podgen_core::domain::{TaskStatus, DEFAULT_QUEUE};
use podgen_core::error::AppError;
use podgen_core::port::{PageRange, StatusFilter, TaskQuery};
use std::str::FromStr;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/task", post(create_task).get(list_tasks))
        .route("/queue", post(enqueue_message))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// POST /task - submit a podcast-generation task
async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> Result<Json<TaskBody>, ApiError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;

    let receipt = state
        .submission
        .submit(SubmitRequest {
            url: body.url.unwrap_or_default(),
            script_prompt: body.script_prompt,
            prompt_text_speaker1: body.prompt_text_speaker1,
            prompt_text_speaker2: body.prompt_text_speaker2,
            prompt_audio_speaker1: body.prompt_audio_speaker1,
            prompt_audio_speaker2: body.prompt_audio_speaker2,
        })
        .await?;

    Ok(Json(TaskBody { data: receipt.task }))
}

/// GET /task - list tasks, or fetch by id (list-shaped either way)
async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> Result<Json<TaskListBody>, ApiError> {
    let status = match params.status.as_deref() {
        None | Some("all") => StatusFilter::All,
        Some(value) => StatusFilter::Is(TaskStatus::from_str(value).map_err(AppError::Domain)?),
    };

    // Both bounds must parse for the range to apply; anything else is
    // ignored rather than rejected
    let range = match (
        params.from.as_deref().and_then(|v| v.parse::<i64>().ok()),
        params.to.as_deref().and_then(|v| v.parse::<i64>().ok()),
    ) {
        (Some(from), Some(to)) => Some(PageRange { from, to }),
        _ => None,
    };

    let page = state
        .query
        .list(&TaskQuery {
            id: params.id,
            status,
            range,
        })
        .await?;

    let select = params.select.unwrap_or_default();
    let data = page
        .tasks
        .into_iter()
        .map(|task| {
            let value = serde_json::to_value(&task).map_err(AppError::Serialization)?;
            Ok(project_fields(value, &select))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(TaskListBody {
        data,
        total: page.total,
    }))
}

/// POST /queue - raw enqueue passthrough (bypasses the outbox on purpose)
async fn enqueue_message(
    State(state): State<AppState>,
    body: Result<Json<EnqueueBody>, JsonRejection>,
) -> Result<Json<EnqueueResponseBody>, ApiError> {
    // An unreadable body is treated like an empty one, so it fails the
    // task_data validation below instead of a generic parse error
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let task_data = match body.task_data {
        Some(value) if value.is_object() => value,
        _ => {
            return Err(AppError::Validation("task_data must be an object".to_string()).into());
        }
    };

    let queue_name = body
        .queue_name
        .unwrap_or_else(|| DEFAULT_QUEUE.to_string());
    let sleep_seconds = body.sleep_seconds.unwrap_or(0);

    let msg_id = state
        .queue
        .enqueue(&task_data, &queue_name, sleep_seconds)
        .await?;

    Ok(Json(EnqueueResponseBody {
        data: EnqueueResult { msg_id },
    }))
}
