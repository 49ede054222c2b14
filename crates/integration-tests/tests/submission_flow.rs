//! Submission flow: atomic task+outbox write, relay dispatch, durability

use podgen_core::application::submission::SubmitRequest;
use podgen_core::application::SubmissionService;
use podgen_core::domain::{defaults, TaskStatus};
use podgen_core::port::{IdProvider, OutboxRepository, TaskRepository};
use podgen_infra_sqlite::create_pool;
use podgen_integration_tests::TestHarness;
use std::sync::Arc;

fn request(url: &str) -> SubmitRequest {
    SubmitRequest {
        url: url.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn submit_creates_pending_task_and_outbox_row_atomically() {
    let harness = TestHarness::in_memory().await;

    let receipt = harness
        .submission
        .submit(request("https://example.com/article"))
        .await
        .unwrap();

    assert!(!receipt.task.id.is_empty());
    assert_eq!(receipt.task.status, TaskStatus::Pending);

    // Exactly one task row exists
    let stored = harness
        .task_repo
        .find_by_id(&receipt.task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, TaskStatus::Pending);

    // Exactly one undispatched outbox row with the wire-shape payload
    let outbox = harness.outbox_repo.fetch_undispatched(10).await.unwrap();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].task_id, receipt.task.id);
    assert_eq!(outbox[0].queue, "moss_ttsd");
    assert_eq!(outbox[0].payload["type"], "ttsd");
    assert_eq!(outbox[0].payload["id"], receipt.task.id.as_str());
    assert_eq!(outbox[0].payload["url"], "https://example.com/article");

    // Nothing reaches the queue before the relay runs
    assert_eq!(harness.queue_message_count().await, 0);
}

#[tokio::test]
async fn invalid_url_produces_no_rows_at_all() {
    let harness = TestHarness::in_memory().await;

    assert!(harness.submission.submit(request("")).await.is_err());
    assert!(harness
        .submission
        .submit(request("notaurl"))
        .await
        .is_err());

    let page = harness.task_repo.query(&Default::default()).await.unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(harness.outbox_row_count().await, 0);
    assert_eq!(harness.queue_message_count().await, 0);
}

/// An id provider that always returns the same id, to force a primary key
/// violation on the second insert.
struct DuplicateId;

impl IdProvider for DuplicateId {
    fn generate_id(&self) -> String {
        "dup-task".to_string()
    }
}

#[tokio::test]
async fn store_failure_rolls_back_and_never_reaches_the_queue() {
    let harness = TestHarness::in_memory().await;
    let submission = SubmissionService::new(
        harness.task_repo.clone(),
        Arc::new(DuplicateId),
        harness.clock.clone(),
    );

    submission
        .submit(request("https://example.com/first"))
        .await
        .unwrap();
    let err = submission
        .submit(request("https://example.com/second"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("constraint"));

    // Only the first submission left any trace
    let page = harness.task_repo.query(&Default::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.tasks[0].url, "https://example.com/first");
    assert_eq!(harness.outbox_row_count().await, 1);
    assert_eq!(harness.queue_message_count().await, 0);
}

#[tokio::test]
async fn relay_failure_leaves_task_pending_and_message_recoverable() {
    let harness = TestHarness::in_memory().await;

    let receipt = harness
        .submission
        .submit(request("https://example.com/a"))
        .await
        .unwrap();

    // Queue down: nothing dispatched, nothing lost
    let broken = harness.relay_with_broken_queue();
    assert_eq!(broken.drain_once().await.unwrap(), 0);

    let task = harness
        .task_repo
        .find_by_id(&receipt.task.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(
        harness.outbox_repo.fetch_undispatched(10).await.unwrap().len(),
        1
    );
    assert_eq!(harness.queue_message_count().await, 0);

    // Queue back up: the same message is delivered
    let relay = harness.relay();
    assert_eq!(relay.drain_once().await.unwrap(), 1);
    assert!(harness
        .outbox_repo
        .fetch_undispatched(10)
        .await
        .unwrap()
        .is_empty());

    let (queue, payload): (String, String) =
        sqlx::query_as("SELECT queue, payload FROM queue_messages LIMIT 1")
            .fetch_one(&harness.pool)
            .await
            .unwrap();
    assert_eq!(queue, "moss_ttsd");
    let payload: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(payload["id"], receipt.task.id.as_str());
    assert_eq!(payload["type"], "ttsd");
}

#[tokio::test]
async fn round_trip_preserves_url_and_default_bundle() {
    let harness = TestHarness::in_memory().await;

    let receipt = harness
        .submission
        .submit(request("https://example.com/roundtrip"))
        .await
        .unwrap();

    let fetched = harness.query.get_by_id(&receipt.task.id).await.unwrap();
    assert_eq!(fetched.url, "https://example.com/roundtrip");
    assert_eq!(fetched.script_prompt.as_deref(), Some(defaults::SCRIPT_PROMPT));
    assert_eq!(
        fetched.prompt_text_speaker1.as_deref(),
        Some(defaults::PROMPT_TEXT_SPEAKER1)
    );
    assert_eq!(
        fetched.prompt_text_speaker2.as_deref(),
        Some(defaults::PROMPT_TEXT_SPEAKER2)
    );
    assert_eq!(
        fetched.prompt_audio_speaker1.as_deref(),
        Some(defaults::PROMPT_AUDIO_SPEAKER1)
    );
    assert_eq!(
        fetched.prompt_audio_speaker2.as_deref(),
        Some(defaults::PROMPT_AUDIO_SPEAKER2)
    );
}

#[tokio::test]
async fn undispatched_outbox_rows_survive_a_restart() {
    let db_path = "/tmp/podgen_test_outbox_restart.db";
    let _ = std::fs::remove_file(db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));

    let task_id;
    {
        let harness = TestHarness::over_pool(create_pool(db_path).await.unwrap()).await;
        let receipt = harness
            .submission
            .submit(request("https://example.com/durable"))
            .await
            .unwrap();
        task_id = receipt.task.id;
        // Simulate a crash before the relay dispatched anything (pool dropped)
        harness.pool.close().await;
    }

    {
        let harness = TestHarness::over_pool(create_pool(db_path).await.unwrap()).await;

        let task = harness.task_repo.find_by_id(&task_id).await.unwrap().unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        // The startup drain delivers the message written before the crash
        assert_eq!(harness.relay().drain_once().await.unwrap(), 1);
        assert_eq!(harness.queue_message_count().await, 1);
        harness.pool.close().await;
    }

    let _ = std::fs::remove_file(db_path);
    let _ = std::fs::remove_file(format!("{}-wal", db_path));
    let _ = std::fs::remove_file(format!("{}-shm", db_path));
}
