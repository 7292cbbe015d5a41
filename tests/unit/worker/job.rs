use std::io::Cursor;

use super::*;
use crate::{
    config::WorkerConfig,
    io::memory::{MemorySource, MemoryStore},
};

fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn sources() -> MemorySource {
    MemorySource::new()
        .with("mem://logo.png", png(20, 10, [255, 0, 0, 255]))
        .with("mem://template.png", png(120, 80, [255, 255, 255, 255]))
}

fn job() -> MockupJob {
    MockupJob {
        mockup_id: "m-1".to_owned(),
        logo_url: "mem://logo.png".to_owned(),
        template_url: "mem://template.png".to_owned(),
        customizations: Default::default(),
        user_id: "u-1".to_owned(),
        attempt: 1,
    }
}

struct Harness {
    runner: JobRunner,
    source: Arc<MemorySource>,
    store: Arc<MemoryStore>,
    reporter: Arc<MemoryReporter>,
}

fn harness(source: MemorySource, budget: Duration) -> Harness {
    let source = Arc::new(source);
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(MemoryReporter::new());
    let generator = MockupGenerator::new(&WorkerConfig::default(), source.clone(), store.clone());
    Harness {
        runner: JobRunner::new(generator, reporter.clone(), budget),
        source,
        store,
        reporter,
    }
}

#[tokio::test]
async fn successful_job_reports_processing_then_completed() {
    let h = harness(sources(), Duration::from_secs(30));
    let outcome = h.runner.run_job(&job(), &CancellationToken::new()).await;

    let JobOutcome::Completed { urls, .. } = outcome else {
        panic!("expected completion, got {outcome:?}");
    };
    assert_eq!(h.store.len(), 2);
    assert_eq!(
        h.reporter.statuses(),
        [MockupStatus::Processing, MockupStatus::Completed]
    );

    let (id, last) = h.reporter.updates().pop().unwrap();
    assert_eq!(id, "m-1");
    assert_eq!(last.urls, Some(urls));
    assert!(last.processing_time_ms.is_some());
}

#[tokio::test]
async fn invalid_job_fails_without_fetching() {
    let h = harness(sources(), Duration::from_secs(30));
    let mut j = job();
    j.customizations.opacity = Some(1.5);

    let outcome = h.runner.run_job(&j, &CancellationToken::new()).await;
    assert!(matches!(
        outcome,
        JobOutcome::Failed { retryable: false, retry_after_ms: None, ref error } if error.starts_with("validation error")
    ));
    assert_eq!(h.reporter.statuses(), [MockupStatus::Failed]);
    assert_eq!(h.source.fetch_count(), 0);
}

#[tokio::test]
async fn fetch_failure_is_retryable_and_stores_nothing() {
    let h = harness(
        MemorySource::new().with("mem://logo.png", png(4, 4, [0, 0, 0, 255])),
        Duration::from_secs(30),
    );
    let outcome = h.runner.run_job(&job(), &CancellationToken::new()).await;

    assert!(matches!(
        outcome,
        JobOutcome::Failed { retryable: true, ref error, .. } if error.starts_with("storage error")
    ));
    assert!(h.store.is_empty());
    assert_eq!(
        h.reporter.statuses(),
        [MockupStatus::Processing, MockupStatus::Failed]
    );
}

#[tokio::test]
async fn budget_overrun_fails_as_retryable_timeout() {
    let h = harness(
        sources().with_delay(Duration::from_secs(10)),
        Duration::from_millis(50),
    );
    let outcome = h.runner.run_job(&job(), &CancellationToken::new()).await;

    assert!(matches!(
        outcome,
        JobOutcome::Failed { retryable: true, ref error, .. } if error.starts_with("timeout")
    ));
    assert!(h.store.is_empty());
    let (_, last) = h.reporter.updates().pop().unwrap();
    assert_eq!(last.status, MockupStatus::Failed);
    assert_eq!(last.retryable, Some(true));
}

#[tokio::test]
async fn cancellation_reports_no_terminal_status() {
    let h = harness(
        sources().with_delay(Duration::from_secs(10)),
        Duration::from_secs(30),
    );
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let outcome = h.runner.run_job(&job(), &cancel).await;
    assert_eq!(outcome, JobOutcome::Cancelled);
    assert_eq!(h.reporter.statuses(), [MockupStatus::Processing]);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn unparseable_payload_is_rejected_without_reports() {
    let h = harness(sources(), Duration::from_secs(30));
    let outcome = h
        .runner
        .run_job_json(b"{\"mockupId\": 3}", &CancellationToken::new())
        .await;
    assert!(matches!(outcome, JobOutcome::Failed { retryable: false, .. }));
    assert!(h.reporter.updates().is_empty());
}

#[tokio::test]
async fn payload_json_runs_the_job() {
    let h = harness(sources(), Duration::from_secs(30));
    let payload = br#"{
        "mockupId": "m-9",
        "logoUrl": "mem://logo.png",
        "templateUrl": "mem://template.png",
        "customizations": {"scale": 0.5, "rotation": 30, "blendMode": "multiply"},
        "userId": "u-9"
    }"#;
    let outcome = h
        .runner
        .run_job_json(payload, &CancellationToken::new())
        .await;
    assert!(matches!(outcome, JobOutcome::Completed { .. }));
    assert_eq!(h.reporter.updates()[0].0, "m-9");
}

#[test]
fn outcome_serializes_with_tag() {
    let json = serde_json::to_value(JobOutcome::Failed {
        error: "storage error: down".to_owned(),
        retryable: true,
        retry_after_ms: Some(2000),
    })
    .unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "outcome": "failed",
            "error": "storage error: down",
            "retryable": true,
            "retry_after_ms": 2000
        })
    );
    let json = serde_json::to_value(JobOutcome::Failed {
        error: "validation error: bad".to_owned(),
        retryable: false,
        retry_after_ms: None,
    })
    .unwrap();
    assert!(json.get("retry_after_ms").is_none());
    assert_eq!(
        serde_json::to_value(JobOutcome::Cancelled).unwrap(),
        serde_json::json!({"outcome": "cancelled"})
    );
}

#[tokio::test]
async fn tracing_reporter_accepts_updates() {
    TracingReporter
        .report("m-1", &StatusUpdate::processing())
        .await
        .unwrap();
}

#[tokio::test]
async fn retryable_failure_reports_the_next_backoff() {
    let mut h = harness(
        MemorySource::new().with("mem://logo.png", png(4, 4, [0, 0, 0, 255])),
        Duration::from_secs(30),
    );
    h.runner = h.runner.with_retry_policy(RetryPolicy {
        attempts: 3,
        base_delay_ms: 500,
    });

    let mut j = job();
    j.attempt = 2;
    let outcome = h.runner.run_job(&j, &CancellationToken::new()).await;
    assert!(matches!(
        outcome,
        JobOutcome::Failed { retryable: true, retry_after_ms: Some(1000), .. }
    ));
    let (_, last) = h.reporter.updates().pop().unwrap();
    assert_eq!(last.retry_after_ms, Some(1000));
}

#[tokio::test]
async fn last_attempt_reports_no_backoff() {
    let mut h = harness(
        MemorySource::new().with("mem://logo.png", png(4, 4, [0, 0, 0, 255])),
        Duration::from_secs(30),
    );
    h.runner = h.runner.with_retry_policy(RetryPolicy {
        attempts: 3,
        base_delay_ms: 500,
    });

    let mut j = job();
    j.attempt = 3;
    let outcome = h.runner.run_job(&j, &CancellationToken::new()).await;
    assert!(matches!(
        outcome,
        JobOutcome::Failed { retryable: true, retry_after_ms: None, .. }
    ));
    let (_, last) = h.reporter.updates().pop().unwrap();
    assert_eq!(last.retry_after_ms, None);
}
