//! Speech pipeline integration tests
//!
//! Exercises ordering, shutdown, and device-recovery behavior without audio
//! hardware.

use std::sync::atomic::Ordering;
use std::time::Duration;

use sous_assistant::{NarrationItem, SpeechPipeline};

mod common;

use common::RecordingBackend;

const READY_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_narration_renders_in_enqueue_order() {
    let backend = RecordingBackend::new();
    let rendered = backend.rendered();

    let mut pipeline = SpeechPipeline::spawn(backend).unwrap();
    assert!(pipeline.wait_ready(READY_TIMEOUT).await);

    let narrator = pipeline.narrator();
    for i in 0..20 {
        narrator.say(format!("line {i}"));
    }

    pipeline.shutdown(None).await;

    let expected: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
    assert_eq!(*rendered.lock().unwrap(), expected);
}

#[tokio::test]
async fn test_enqueue_after_shutdown_is_noop() {
    let backend = RecordingBackend::new();
    let rendered = backend.rendered();

    let mut pipeline = SpeechPipeline::spawn(backend).unwrap();
    assert!(pipeline.wait_ready(READY_TIMEOUT).await);

    let narrator = pipeline.narrator();
    narrator.say("before");
    pipeline.shutdown(None).await;

    narrator.say("after");
    narrator.narrate(vec![NarrationItem::new("also after")]);

    assert_eq!(*rendered.lock().unwrap(), vec!["before".to_string()]);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let backend = RecordingBackend::new();
    let rendered = backend.rendered();

    let mut pipeline = SpeechPipeline::spawn(backend).unwrap();
    assert!(pipeline.wait_ready(READY_TIMEOUT).await);

    pipeline
        .shutdown(Some(NarrationItem::new("goodbye")))
        .await;
    // Second call must return immediately and speak nothing further
    pipeline
        .shutdown(Some(NarrationItem::new("goodbye again")))
        .await;

    assert_eq!(*rendered.lock().unwrap(), vec!["goodbye".to_string()]);
}

#[tokio::test]
async fn test_farewell_spoken_after_pending_items() {
    let backend = RecordingBackend::new();
    let rendered = backend.rendered();

    let mut pipeline = SpeechPipeline::spawn(backend).unwrap();
    assert!(pipeline.wait_ready(READY_TIMEOUT).await);

    pipeline.narrator().say("last request");
    pipeline
        .shutdown(Some(NarrationItem::new("shutting down")))
        .await;

    assert_eq!(
        *rendered.lock().unwrap(),
        vec!["last request".to_string(), "shutting down".to_string()]
    );
}

#[tokio::test]
async fn test_render_failure_does_not_block_next_item() {
    let backend = RecordingBackend::new().fail_render_once_on("two");
    let rendered = backend.rendered();
    let init_calls = backend.init_calls();

    let mut pipeline = SpeechPipeline::spawn(backend).unwrap();
    assert!(pipeline.wait_ready(READY_TIMEOUT).await);

    let narrator = pipeline.narrator();
    narrator.say("one");
    narrator.say("two");
    narrator.say("three");

    pipeline.shutdown(None).await;

    // The failed item is dropped, not replayed; the pipeline keeps going
    assert_eq!(
        *rendered.lock().unwrap(),
        vec!["one".to_string(), "three".to_string()]
    );

    // Startup init plus exactly one reinitialization for the one failure
    assert_eq!(init_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_terminal_init_failure_degrades_silently() {
    let backend = RecordingBackend::failing_init();
    let rendered = backend.rendered();

    let mut pipeline = SpeechPipeline::spawn(backend).unwrap();

    // Worker reports not-ready instead of hanging startup
    assert!(!pipeline.wait_ready(READY_TIMEOUT).await);

    let narrator = pipeline.narrator();
    narrator.say("nobody hears this");

    // Shutdown still drains and returns without deadlock
    pipeline.shutdown(None).await;

    assert!(rendered.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_disabled_pipeline_discards_everything() {
    let mut pipeline = SpeechPipeline::disabled();

    assert!(!pipeline.wait_ready(READY_TIMEOUT).await);

    let narrator = pipeline.narrator();
    narrator.say("into the void");

    pipeline.shutdown(Some(NarrationItem::new("goodbye"))).await;
}
