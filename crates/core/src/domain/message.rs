// Queue Message - transient payload handed to the external worker

use crate::domain::Task;
use serde::{Deserialize, Serialize};

/// Task type tag for podcast generation messages.
pub const TASK_TYPE_TTSD: &str = "ttsd";

/// Well-known channel the external TTS worker consumes.
pub const DEFAULT_QUEUE: &str = "moss_ttsd";

/// Wire payload describing one task for the external worker.
///
/// Constructed fresh per submission; ownership transfers to the queue on a
/// successful enqueue and this system never sees it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    #[serde(rename = "type")]
    pub task_type: String,
    pub url: String,
    pub script_prompt: Option<String>,
    pub prompt_audio_speaker1: Option<String>,
    pub prompt_text_speaker1: Option<String>,
    pub prompt_audio_speaker2: Option<String>,
    pub prompt_text_speaker2: Option<String>,
    /// Task id, stringified for the worker.
    pub id: String,
}

impl QueueMessage {
    /// Build the message for a freshly created task.
    pub fn for_task(task: &Task) -> Self {
        Self {
            task_type: TASK_TYPE_TTSD.to_string(),
            url: task.url.clone(),
            script_prompt: task.script_prompt.clone(),
            prompt_audio_speaker1: task.prompt_audio_speaker1.clone(),
            prompt_text_speaker1: task.prompt_text_speaker1.clone(),
            prompt_audio_speaker2: task.prompt_audio_speaker2.clone(),
            prompt_text_speaker2: task.prompt_text_speaker2.clone(),
            id: task.id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::defaults::default_bundle;

    #[test]
    fn message_carries_type_tag_and_stringified_id() {
        let task = Task::new("abc-123", 42, "https://example.com/a", &default_bundle());
        let msg = QueueMessage::for_task(&task);

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "ttsd");
        assert_eq!(value["id"], "abc-123");
        assert_eq!(value["url"], "https://example.com/a");
        assert_eq!(value["prompt_text_speaker1"], task.prompt_text_speaker1.unwrap());
    }
}
