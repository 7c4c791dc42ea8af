mod support;

use marcel::analysis::{AnalysisClient, ImagePayload};
use marcel::failure::{Failure, FailureKind};
use marcel::request::{AttemptEvent, AttemptStatus};
use marcel::upload::UploadClient;
use marcel::ClientConfig;

use support::{CannedResponse, TestServer};

fn config(base: &str) -> ClientConfig {
  let mut config = ClientConfig::default();
  config.catalog_api_base = base.to_string();
  config.analysis_api_base = base.to_string();
  config.image_upload_endpoint = format!("{base}/image/upload");
  config.request_timeout_ms = 2_000;
  config.max_retry_attempts = 3;
  config.retry_base_delay_ms = 10;
  config
}

fn photo() -> ImagePayload {
  ImagePayload::new(vec![0xFF, 0xD8, 0xFF], "image/jpeg", "face.jpg")
}

const REPORT: &str = r#"{
  "face_shape": "oval",
  "confidence": 0.91,
  "recommendations": [
    { "name": "Textured Crop", "match_score": 0.88, "tags": ["short"], "difficulty": "easy" },
    { "name": "Side Part", "match_score": 0.74 }
  ]
}"#;

#[tokio::test]
async fn analyze_posts_the_photo_and_parses_the_report() {
  let server = TestServer::start(|path, _| {
    assert_eq!(path, "/api/v1/analyze-and-recommend");
    CannedResponse::json(200, REPORT)
  })
  .await;
  let client = AnalysisClient::new(&config(&server.base)).unwrap();

  let report = client.analyze(&photo(), None).await.unwrap();
  assert_eq!(report.face_shape, "oval");
  assert_eq!(report.recommendations.len(), 2);
  assert_eq!(report.recommendations[0].name, "Textured Crop");
}

#[tokio::test]
async fn analyze_retries_with_a_rebuilt_body_and_reports_progress() {
  let server = TestServer::start(|_, hit| {
    if hit == 0 {
      CannedResponse::json(503, r#"{"error": "Service unavailable"}"#)
    } else {
      CannedResponse::json(200, REPORT)
    }
  })
  .await;
  let client = AnalysisClient::new(&config(&server.base)).unwrap();

  let mut events: Vec<AttemptEvent> = Vec::new();
  let mut observer = |event: AttemptEvent| events.push(event);

  let report = client.analyze(&photo(), Some(&mut observer)).await.unwrap();
  assert_eq!(report.face_shape, "oval");
  assert_eq!(server.hit_count(), 2);

  let summary: Vec<_> = events.iter().map(|e| (e.status, e.attempt)).collect();
  assert_eq!(
    summary,
    vec![
      (AttemptStatus::Attempting, 1),
      (AttemptStatus::Attempting, 2),
      (AttemptStatus::Success, 2),
    ]
  );
}

#[tokio::test]
async fn analyze_surfaces_the_service_error_kind() {
  let server =
    TestServer::start(|_, _| CannedResponse::json(400, r#"{"error": "No face detected in the image"}"#))
      .await;
  let client = AnalysisClient::new(&config(&server.base)).unwrap();

  let result = client.analyze(&photo(), None).await;
  match result {
    Err(failure) => {
      assert_eq!(failure.kind(), FailureKind::NoFaceDetected);
      assert_eq!(failure.advice().title, "No Face Detected");
    }
    Ok(_) => panic!("expected a failure"),
  }
  assert_eq!(server.hit_count(), 1);
}

#[tokio::test]
async fn oversized_photos_never_reach_the_network() {
  let server = TestServer::start(|_, _| CannedResponse::json(200, REPORT)).await;
  let client = AnalysisClient::new(&config(&server.base)).unwrap();

  let huge = ImagePayload::new(vec![0u8; 10 * 1024 * 1024 + 1], "image/jpeg", "big.jpg");
  let result = client.analyze(&huge, None).await;

  assert!(matches!(result, Err(Failure::ValidationFailed { .. })));
  assert_eq!(server.hit_count(), 0);
}

#[tokio::test]
async fn upload_returns_the_hosted_url() {
  let server = TestServer::start(|path, _| {
    assert_eq!(path, "/image/upload");
    CannedResponse::json(200, r#"{"secure_url": "https://cdn.example.com/face.jpg"}"#)
  })
  .await;
  let client = UploadClient::new(&config(&server.base)).unwrap();

  let url = client.upload(&photo()).await.unwrap();
  assert_eq!(url, "https://cdn.example.com/face.jpg");
}

#[tokio::test]
async fn upload_without_a_hosted_url_is_malformed() {
  let server = TestServer::start(|_, _| CannedResponse::json(200, r#"{"ok": true}"#)).await;
  let client = UploadClient::new(&config(&server.base)).unwrap();

  let result = client.upload(&photo()).await;
  assert!(matches!(result, Err(Failure::MalformedResponse(_))));
}
