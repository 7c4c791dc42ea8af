//! Image-hosting upload client.
//!
//! Pushes a photo to the configured hosting endpoint with the unsigned
//! upload preset and returns the hosted URL. Single attempt: hosted uploads
//! are not idempotent and the host has its own availability story.

use serde_json::Value;

use crate::analysis::ImagePayload;
use crate::config::ClientConfig;
use crate::failure::{Failure, FailureKind};
use crate::request::{expect_json, RequestClient, RetryPolicy};

pub struct UploadClient {
  request: RequestClient,
  endpoint: String,
  preset: String,
}

impl UploadClient {
  pub fn new(config: &ClientConfig) -> Result<Self, Failure> {
    config.validate()?;
    Ok(UploadClient {
      request: RequestClient::new(RetryPolicy::single_attempt(config.timeout()))?,
      endpoint: config.image_upload_endpoint.clone(),
      preset: config.image_upload_preset.clone(),
    })
  }

  /// Upload a photo and return its hosted `secure_url`.
  pub async fn upload(&self, image: &ImagePayload) -> Result<String, Failure> {
    if image.bytes.is_empty() {
      return Err(Failure::invalid_kind("no image provided", FailureKind::InvalidFormat));
    }
    if image.bytes.len() > crate::analysis::MAX_IMAGE_BYTES {
      return Err(Failure::invalid_kind(
        "image exceeds the 10 MB limit",
        FailureKind::PayloadTooLarge,
      ));
    }

    let response = self
      .request
      .execute(
        || {
          let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| Failure::invalid(format!("invalid MIME type: {e}")))?;
          let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.clone());
          Ok(self.request.http().post(&self.endpoint).multipart(form))
        },
        None,
      )
      .await?;

    let body = expect_json(response).await?;
    body
      .get("secure_url")
      .and_then(Value::as_str)
      .map(str::to_string)
      .ok_or_else(|| Failure::MalformedResponse("upload response lacks a secure_url".to_string()))
  }
}
