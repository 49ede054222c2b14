// Task Domain Model

use serde::{Deserialize, Serialize};

/// Task ID (UUID v4, injected by an IdProvider)
pub type TaskId = String;

/// Task lifecycle status.
///
/// Canonical values only. `done` is a deprecated alias of `completed` kept
/// for rows written by older workers; it is accepted on read and never
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Processing,
    #[serde(alias = "done")]
    Completed,
    Failed,
}

impl TaskStatus {
    /// Spellings accepted in the store for this status.
    ///
    /// The external worker may still write the deprecated `done` value, so
    /// filters for `Completed` must match both spellings.
    pub fn storage_values(&self) -> &'static [&'static str] {
        match self {
            TaskStatus::Pending => &["pending"],
            TaskStatus::Processing => &["processing"],
            TaskStatus::Completed => &["completed", "done"],
            TaskStatus::Failed => &["failed"],
        }
    }

    /// Terminal statuses receive no further worker updates.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Processing => write!(f, "processing"),
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = crate::domain::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "processing" => Ok(TaskStatus::Processing),
            "completed" | "done" => Ok(TaskStatus::Completed),
            "failed" => Ok(TaskStatus::Failed),
            other => Err(crate::domain::DomainError::UnknownStatus(other.to_string())),
        }
    }
}

/// One speaker voice profile: a reference audio sample plus its transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerProfile {
    pub audio: String,
    pub text: String,
}

/// Generation parameter bundle handed to the external worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptBundle {
    pub script_prompt: String,
    pub speaker1: SpeakerProfile,
    pub speaker2: SpeakerProfile,
}

/// Task Entity
///
/// One requested podcast-generation job. The submission path only ever
/// creates rows in `pending`; every later mutation (`status`, `result_url`,
/// `script`) is performed by the external worker writing back to the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub url: String,

    pub script_prompt: Option<String>,
    pub prompt_text_speaker1: Option<String>,
    pub prompt_text_speaker2: Option<String>,
    pub prompt_audio_speaker1: Option<String>,
    pub prompt_audio_speaker2: Option<String>,

    pub status: TaskStatus,
    pub created_at: i64, // epoch ms

    pub result_url: Option<String>,
    pub script: Option<String>,
}

impl Task {
    /// Create a new pending task.
    ///
    /// `id` and `created_at` are injected (IdProvider / TimeProvider), never
    /// generated here, so tests stay deterministic.
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        url: impl Into<String>,
        bundle: &PromptBundle,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            script_prompt: Some(bundle.script_prompt.clone()),
            prompt_text_speaker1: Some(bundle.speaker1.text.clone()),
            prompt_text_speaker2: Some(bundle.speaker2.text.clone()),
            prompt_audio_speaker1: Some(bundle.speaker1.audio.clone()),
            prompt_audio_speaker2: Some(bundle.speaker2.audio.clone()),
            status: TaskStatus::Pending,
            created_at,
            result_url: None,
            script: None,
        }
    }
}

/// Validate a submitted URL before any side effect.
///
/// Mirrors the submission form check: non-empty and an absolute
/// http(s) URL (scheme match is case-insensitive).
pub fn validate_url(url: &str) -> crate::domain::error::Result<()> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(crate::domain::DomainError::UrlMissing);
    }
    let lower = trimmed.to_ascii_lowercase();
    let rest = lower
        .strip_prefix("http://")
        .or_else(|| lower.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(crate::domain::DomainError::UrlInvalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_canonical_values() {
        assert_eq!(TaskStatus::from_str("pending").unwrap(), TaskStatus::Pending);
        assert_eq!(
            TaskStatus::from_str("processing").unwrap(),
            TaskStatus::Processing
        );
        assert_eq!(
            TaskStatus::from_str("completed").unwrap(),
            TaskStatus::Completed
        );
        assert_eq!(TaskStatus::from_str("failed").unwrap(), TaskStatus::Failed);
    }

    #[test]
    fn status_accepts_done_as_completed_alias() {
        assert_eq!(TaskStatus::from_str("done").unwrap(), TaskStatus::Completed);
        // but Display never writes the alias back
        assert_eq!(TaskStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(TaskStatus::from_str("finished").is_err());
        assert!(TaskStatus::from_str("").is_err());
    }

    #[test]
    fn completed_filter_matches_both_spellings() {
        assert_eq!(
            TaskStatus::Completed.storage_values(),
            &["completed", "done"]
        );
        assert_eq!(TaskStatus::Pending.storage_values(), &["pending"]);
    }

    #[test]
    fn url_validation() {
        assert!(validate_url("https://example.com/a").is_ok());
        assert!(validate_url("http://example.com").is_ok());
        assert!(validate_url("HTTPS://EXAMPLE.COM").is_ok());

        assert!(matches!(
            validate_url(""),
            Err(crate::domain::DomainError::UrlMissing)
        ));
        assert!(matches!(
            validate_url("   "),
            Err(crate::domain::DomainError::UrlMissing)
        ));
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(crate::domain::DomainError::UrlInvalid)
        ));
        assert!(matches!(
            validate_url("https://"),
            Err(crate::domain::DomainError::UrlInvalid)
        ));
    }

    #[test]
    fn new_task_starts_pending_with_bundle_applied() {
        let bundle = crate::domain::defaults::default_bundle();
        let task = Task::new("task-1", 1000, "https://example.com", &bundle);

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at, 1000);
        assert_eq!(task.script_prompt.as_deref(), Some(bundle.script_prompt.as_str()));
        assert_eq!(
            task.prompt_audio_speaker2.as_deref(),
            Some(bundle.speaker2.audio.as_str())
        );
        assert!(task.result_url.is_none());
        assert!(task.script.is_none());
    }
}
