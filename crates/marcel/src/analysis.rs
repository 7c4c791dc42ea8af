//! Face-analysis client.
//!
//! Uploads a photo for analysis and normalizes the two response shapes the
//! service has shipped (flat fields and a nested `face_analysis` object) into
//! one report. Preconditions on the image are checked locally so obviously
//! bad uploads never cost a round trip.

use serde_json::Value;

use crate::config::ClientConfig;
use crate::failure::{Failure, FailureKind};
use crate::record::{string_field, string_list};
use crate::request::{expect_json, AttemptEvent, RequestClient};

/// Upper bound on an analysis upload.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const ACCEPTED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

/// A photo ready for upload.
#[derive(Debug, Clone)]
pub struct ImagePayload {
  pub bytes: Vec<u8>,
  pub mime: String,
  pub file_name: String,
}

impl ImagePayload {
  pub fn new(bytes: Vec<u8>, mime: impl Into<String>, file_name: impl Into<String>) -> Self {
    ImagePayload { bytes, mime: mime.into(), file_name: file_name.into() }
  }

  /// Guess the MIME type from the file extension; unknown extensions are
  /// passed along as jpeg and left to the server's own validation.
  pub fn from_path_bytes(path: &std::path::Path, bytes: Vec<u8>) -> Self {
    let mime = match path.extension().and_then(|e| e.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("png") => "image/png",
      _ => "image/jpeg",
    };
    let file_name = path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
      .unwrap_or_else(|| "photo.jpg".to_string());
    ImagePayload { bytes, mime: mime.to_string(), file_name }
  }

  fn validate(&self) -> Result<(), Failure> {
    if self.bytes.is_empty() {
      return Err(Failure::invalid_kind("no image provided", FailureKind::InvalidFormat));
    }
    if self.bytes.len() > MAX_IMAGE_BYTES {
      return Err(Failure::invalid_kind(
        "image exceeds the 10 MB limit",
        FailureKind::PayloadTooLarge,
      ));
    }
    if !ACCEPTED_MIME_TYPES.contains(&self.mime.as_str()) {
      return Err(Failure::invalid_kind(
        format!("unsupported image type {}", self.mime),
        FailureKind::InvalidFormat,
      ));
    }
    Ok(())
  }
}

/// The normalized analysis result.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
  pub face_shape: String,
  /// Model confidence, clamped to [0, 1].
  pub confidence: f64,
  /// Raw facial measurements, when the service includes them.
  pub measurements: Option<Value>,
  pub recommendations: Vec<RecommendedStyle>,
}

#[derive(Debug, Clone)]
pub struct RecommendedStyle {
  pub name: String,
  /// Fit against the detected face shape, clamped to [0, 1].
  pub match_score: f64,
  pub image_url: Option<String>,
  pub description: Option<String>,
  pub tags: Vec<String>,
  pub hair_type: Vec<String>,
  pub difficulty: Option<String>,
}

pub struct AnalysisClient {
  request: RequestClient,
  base: String,
}

impl AnalysisClient {
  pub fn new(config: &ClientConfig) -> Result<Self, Failure> {
    config.validate()?;
    Ok(AnalysisClient {
      request: RequestClient::new(config.retry_policy())?,
      base: config.analysis_api_base.trim_end_matches('/').to_string(),
    })
  }

  /// Analyze a photo and return style recommendations.
  ///
  /// The multipart body is rebuilt for every attempt. The optional observer
  /// receives attempt progress for UI feedback.
  pub async fn analyze(
    &self,
    image: &ImagePayload,
    observer: Option<&mut dyn FnMut(AttemptEvent)>,
  ) -> Result<AnalysisReport, Failure> {
    image.validate()?;

    let url = format!("{}/api/v1/analyze-and-recommend", self.base);
    let response = self
      .request
      .execute(
        || {
          let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| Failure::invalid(format!("invalid MIME type: {e}")))?;
          let form = reqwest::multipart::Form::new().part("file", part);
          Ok(self.request.http().post(&url).multipart(form))
        },
        observer,
      )
      .await?;

    let body = expect_json(response).await?;
    parse_report(&body)
  }
}

/// Normalize either wire form into an [`AnalysisReport`].
fn parse_report(body: &Value) -> Result<AnalysisReport, Failure> {
  // Nested form wraps the face fields under `face_analysis`.
  let face = body.get("face_analysis").unwrap_or(body);

  let face_shape = string_field(face, "face_shape")
    .ok_or_else(|| Failure::MalformedResponse("analysis result lacks a face shape".to_string()))?;

  let confidence = face.get("confidence").and_then(Value::as_f64).unwrap_or(0.0).clamp(0.0, 1.0);
  let measurements = face.get("measurements").filter(|m| m.is_object()).cloned();

  let recommendations = body
    .get("recommendations")
    .and_then(Value::as_array)
    .ok_or_else(|| Failure::MalformedResponse("analysis result lacks recommendations".to_string()))?
    .iter()
    .map(parse_recommendation)
    .collect();

  Ok(AnalysisReport { face_shape, confidence, measurements, recommendations })
}

fn parse_recommendation(raw: &Value) -> RecommendedStyle {
  let score = raw
    .get("match_score")
    .or_else(|| raw.get("matchScore"))
    .and_then(Value::as_f64)
    .unwrap_or(0.0)
    .clamp(0.0, 1.0);

  RecommendedStyle {
    name: string_field(raw, "name")
      .or_else(|| string_field(raw, "title"))
      .unwrap_or_else(|| "Untitled style".to_string()),
    match_score: score,
    image_url: string_field(raw, "image_url").or_else(|| string_field(raw, "imageUrl")),
    description: string_field(raw, "description"),
    tags: string_list(raw, "tags"),
    hair_type: string_list(raw, "hair_type"),
    difficulty: string_field(raw, "difficulty"),
  }
}
