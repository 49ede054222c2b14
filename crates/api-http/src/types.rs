// HTTP Request/Response Types

use podgen_core::domain::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// POST /task body. Unknown fields (including a client-supplied `status`,
/// which submission always overrides to `pending`) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskBody {
    #[serde(default)]
    pub url: Option<String>,
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

/// POST /queue body. `message` is a deprecated alias of `task_data`;
/// explicit `null` and an absent field fail validation the same way.
#[derive(Debug, Default, Deserialize)]
pub struct EnqueueBody {
    #[serde(default, alias = "message")]
    pub task_data: Option<Value>,
    #[serde(default)]
    pub queue_name: Option<String>,
    #[serde(default)]
    pub sleep_seconds: Option<i64>,
}

/// GET /task query parameters. `from`/`to` are parsed leniently: both must
/// be present and numeric for the range to apply, anything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub select: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskBody {
    pub data: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskListBody {
    pub data: Vec<Value>,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct EnqueueResult {
    pub msg_id: i64,
}

#[derive(Debug, Serialize)]
pub struct EnqueueResponseBody {
    pub data: EnqueueResult,
}

/// Apply a `select` projection to a serialized task. `*`, empty, and
/// whitespace-only selections keep every field; otherwise only the named
/// keys are retained.
pub fn project_fields(task: Value, select: &str) -> Value {
    let wanted: Vec<&str> = select
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();

    if wanted.is_empty() || wanted.contains(&"*") {
        return task;
    }

    match task {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| wanted.contains(&key.as_str()))
                .collect(),
        ),
        other => other,
    }
}
