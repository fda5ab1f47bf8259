//! End-to-end controller tests against a mock generation service.

use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use breel_client::{GeneratorClient, GeneratorClientConfig};
use breel_controller::{ControllerConfig, ControllerError, JobController, JobPhase};
use breel_models::{RenderSettings, SourceDocument};

fn controller_for(server: &MockServer) -> JobController {
    let client = GeneratorClient::new(GeneratorClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(2),
        max_retries: 0,
    })
    .unwrap();

    JobController::new(
        client,
        ControllerConfig {
            poll_interval: Duration::from_millis(10),
            retry_base_delay: Duration::from_millis(20),
            retry_max_delay: Duration::from_millis(100),
            max_transport_failures: 3,
            download_dir: "./downloads".to_string(),
        },
    )
}

fn completed_body() -> serde_json::Value {
    serde_json::json!({
        "status": "completed",
        "progress": 100,
        "current_step": "Completed",
        "result": {
            "video_path": "outputs/j-1.mp4",
            "script": "Key ideas from the book...",
            "category": "business",
            "marketing": {
                "caption": "The book in three minutes",
                "hashtags": ["#books", "#learning"],
                "description": "Everything that matters, condensed.",
                "hook": "Stop scrolling, start learning"
            }
        }
    })
}

async fn mount_submission(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"job_id": "j-1"})),
        )
        .mount(server)
        .await;
}

/// Mount a status response consumed exactly once; mount order decides
/// the sequence the poll loop observes.
async fn mount_status_once(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/job/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn wait_for_terminal(controller: &JobController) -> JobPhase {
    let mut rx = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|p| p.is_terminal()))
        .await
        .expect("job never reached a terminal phase")
        .expect("phase channel closed")
        .clone()
}

#[tokio::test]
async fn progress_ladder_ends_completed() {
    let server = MockServer::start().await;
    mount_submission(&server).await;

    for (progress, step) in [(0, "Starting"), (25, "Extracting content"), (60, "Generating voiceover")] {
        mount_status_once(
            &server,
            serde_json::json!({"status": "processing", "progress": progress, "current_step": step}),
        )
        .await;
    }
    mount_status_once(&server, completed_body()).await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1, 2, 3]).unwrap();
    let job_id = controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();
    assert_eq!(job_id.as_str(), "j-1");

    // Submission leaves the controller in processing before any poll.
    assert!(matches!(controller.phase(), JobPhase::Processing { .. }));

    let terminal = wait_for_terminal(&controller).await;
    match terminal {
        JobPhase::Completed { result } => {
            assert_eq!(result.video_path, "outputs/j-1.mp4");
            assert_eq!(result.marketing.hashtag_line(), "#books #learning");
        }
        other => panic!("expected completion, got {other:?}"),
    }
}

#[tokio::test]
async fn failed_job_surfaces_server_error_text() {
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_status_once(
        &server,
        serde_json::json!({"status": "failed", "progress": 40, "error": "Could not extract content"}),
    )
    .await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.txt", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();

    let terminal = wait_for_terminal(&controller).await;
    assert_eq!(
        terminal,
        JobPhase::Failed {
            message: "Could not extract content".to_string()
        }
    );
}

#[tokio::test]
async fn transport_failures_below_bound_keep_processing() {
    let server = MockServer::start().await;
    mount_submission(&server).await;

    // Two query failures, then a clean completion: the job must
    // survive the outage without surfacing an error.
    for _ in 0..2 {
        Mock::given(method("GET"))
            .and(path("/api/job/j-1"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .mount(&server)
            .await;
    }
    mount_status_once(&server, completed_body()).await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();

    let terminal = wait_for_terminal(&controller).await;
    assert!(matches!(terminal, JobPhase::Completed { .. }));
}

#[tokio::test]
async fn transport_failures_beyond_bound_fail_the_job() {
    let server = MockServer::start().await;
    mount_submission(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/job/j-1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();

    let terminal = wait_for_terminal(&controller).await;
    match terminal {
        JobPhase::Failed { message } => assert!(message.contains("Lost connection")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn submission_transport_error_is_terminal() {
    // No server at all.
    let client = GeneratorClient::new(GeneratorClientConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout: Duration::from_millis(200),
        max_retries: 0,
    })
    .unwrap();
    let controller = JobController::new(client, ControllerConfig::default());

    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    let err = controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Submit(_)));

    match controller.phase() {
        JobPhase::Failed { message } => assert!(message.starts_with("Upload failed")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_url_is_rejected_without_phase_change() {
    let server = MockServer::start().await;
    let controller = controller_for(&server);

    let err = controller
        .submit_url("   ", RenderSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::EmptyUrl));
    assert_eq!(controller.phase(), JobPhase::Idle);
}

#[tokio::test]
async fn second_submission_while_busy_is_rejected() {
    let server = MockServer::start().await;
    mount_submission(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/job/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "processing", "progress": 10, "current_step": "Working"}),
        ))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();

    let second = SourceDocument::new("other.pdf", vec![1]).unwrap();
    let err = controller
        .submit_document(second, RenderSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ControllerError::Busy));
}

#[tokio::test]
async fn reset_returns_to_idle_and_allows_resubmission() {
    let server = MockServer::start().await;
    mount_submission(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/job/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"status": "processing", "progress": 10, "current_step": "Working"}),
        ))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();
    assert!(controller.phase().is_busy());

    controller.reset().await;
    assert_eq!(controller.phase(), JobPhase::Idle);
    assert!(controller.job_id().await.is_none());

    // Polling stopped: the phase stays idle even after more interval
    // ticks would have fired.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(controller.phase(), JobPhase::Idle);

    let again = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(again, RenderSettings::default())
        .await
        .unwrap();
    assert!(controller.phase().is_busy());
}

#[tokio::test]
async fn download_without_url_leaves_job_completed() {
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_status_once(&server, completed_body()).await;

    Mock::given(method("GET"))
        .and(path("/api/download/j-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"message": "still rendering"})),
        )
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();
    wait_for_terminal(&controller).await;

    let dir = tempfile::tempdir().unwrap();
    let err = controller.download_to(dir.path()).await.unwrap_err();
    assert!(matches!(err, ControllerError::DownloadUnavailable));

    // Non-fatal: the job is still completed and no file appeared.
    assert!(matches!(controller.phase(), JobPhase::Completed { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn download_streams_video_for_completed_job() {
    let server = MockServer::start().await;
    mount_submission(&server).await;
    mount_status_once(&server, completed_body()).await;

    Mock::given(method("GET"))
        .and(path("/api/download/j-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"download_url": "/outputs/j-1.mp4", "message": "File ready"}),
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/outputs/j-1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    let doc = SourceDocument::new("book.pdf", vec![1]).unwrap();
    controller
        .submit_document(doc, RenderSettings::default())
        .await
        .unwrap();
    wait_for_terminal(&controller).await;

    let dir = tempfile::tempdir().unwrap();
    let dest = controller.download_to(dir.path()).await.unwrap();

    assert_eq!(dest.file_name().unwrap().to_str().unwrap(), "video_j-1.mp4");
    assert_eq!(std::fs::metadata(&dest).unwrap().len(), 1024);
    assert!(matches!(controller.phase(), JobPhase::Completed { .. }));
}

#[tokio::test]
async fn download_before_completion_is_rejected() {
    let server = MockServer::start().await;
    let controller = controller_for(&server);

    let dir = tempfile::tempdir().unwrap();
    let err = controller.download_to(dir.path()).await.unwrap_err();
    assert!(matches!(err, ControllerError::NotCompleted));
}

#[tokio::test]
async fn url_submission_runs_to_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/process"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"job_id": "j-1", "message": "Processing started"}),
        ))
        .mount(&server)
        .await;
    mount_status_once(&server, completed_body()).await;

    let controller = controller_for(&server);
    controller
        .submit_url("https://example.com/article", RenderSettings::default())
        .await
        .unwrap();

    let terminal = wait_for_terminal(&controller).await;
    assert!(matches!(terminal, JobPhase::Completed { .. }));
}
