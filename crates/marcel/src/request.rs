//! The retry-capable request client.
//!
//! Attempts are sequential: each one is bounded by a timeout, failures are
//! classified once into the [`Failure`] taxonomy, and only retryable failures
//! (timeouts and 5xx) earn another attempt after an exponentially growing
//! delay. Whatever failed last is what the caller sees.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use tokio::time::{sleep, timeout};

use crate::failure::{Failure, FailureKind};

/// How many attempts a request gets and how they are paced.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub base_delay: Duration,
  pub timeout: Duration,
}

impl RetryPolicy {
  /// A policy for non-idempotent requests: one shot, still time-bounded.
  pub fn single_attempt(timeout: Duration) -> Self {
    RetryPolicy { max_attempts: 1, base_delay: Duration::ZERO, timeout }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
  Attempting,
  Success,
}

/// Progress report handed to an attempt observer. Observability only; the
/// observer can never alter control flow.
#[derive(Debug, Clone, Copy)]
pub struct AttemptEvent {
  pub status: AttemptStatus,
  pub attempt: u32,
  pub total_attempts: u32,
}

/// Run `attempt_fn` under `policy`, retrying retryable failures.
///
/// The delay before attempt n+1 is `base_delay * 2^(n-1)`, so inter-attempt
/// delays grow strictly. The observer, if any, fires synchronously before
/// every attempt and once more on final success.
pub async fn run_with_retry<T, F, Fut>(
  policy: &RetryPolicy,
  mut attempt_fn: F,
  mut observer: Option<&mut dyn FnMut(AttemptEvent)>,
) -> Result<T, Failure>
where
  F: FnMut(u32) -> Fut,
  Fut: Future<Output = Result<T, Failure>>,
{
  let mut last_failure = Failure::invalid("retry policy allows no attempts");

  for attempt in 0..policy.max_attempts {
    if attempt > 0 {
      sleep(policy.base_delay * 2u32.pow(attempt - 1)).await;
    }

    if let Some(obs) = observer.as_deref_mut() {
      obs(AttemptEvent {
        status: AttemptStatus::Attempting,
        attempt: attempt + 1,
        total_attempts: policy.max_attempts,
      });
    }

    match attempt_fn(attempt).await {
      Ok(value) => {
        if let Some(obs) = observer.as_deref_mut() {
          obs(AttemptEvent {
            status: AttemptStatus::Success,
            attempt: attempt + 1,
            total_attempts: policy.max_attempts,
          });
        }
        return Ok(value);
      }
      Err(failure) => {
        if !failure.is_retryable() {
          return Err(failure);
        }
        tracing::debug!(attempt = attempt + 1, %failure, "retryable attempt failed");
        last_failure = failure;
      }
    }
  }

  Err(last_failure)
}

/// An HTTP client that owns a retry policy.
///
/// Requests are rebuilt per attempt (multipart bodies are not replayable),
/// bounded by the policy's timeout, and classified into the failure taxonomy
/// before any retry decision.
pub struct RequestClient {
  http: reqwest::Client,
  policy: RetryPolicy,
}

impl RequestClient {
  pub fn new(policy: RetryPolicy) -> Result<Self, Failure> {
    let http = reqwest::Client::builder()
      .build()
      .map_err(|e| Failure::invalid(format!("could not construct HTTP client: {e}")))?;
    Ok(RequestClient { http, policy })
  }

  /// A sibling client sharing the same connection pool under another policy.
  pub fn with_policy(&self, policy: RetryPolicy) -> Self {
    RequestClient { http: self.http.clone(), policy }
  }

  pub fn http(&self) -> &reqwest::Client {
    &self.http
  }

  pub fn policy(&self) -> &RetryPolicy {
    &self.policy
  }

  /// Execute a request, rebuilding it with `build` for every attempt.
  pub async fn execute<B>(
    &self,
    build: B,
    observer: Option<&mut dyn FnMut(AttemptEvent)>,
  ) -> Result<reqwest::Response, Failure>
  where
    B: Fn() -> Result<reqwest::RequestBuilder, Failure>,
  {
    run_with_retry(
      &self.policy,
      |_attempt| {
        let request = build();
        async move { self.send_once(request?).await }
      },
      observer,
    )
    .await
  }

  /// One bounded attempt: send, enforce the timeout, classify.
  async fn send_once(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, Failure> {
    // Dropping the in-flight future on timeout aborts the call; a response
    // arriving after that can never be observed.
    let response = match timeout(self.policy.timeout, request.send()).await {
      Err(_) => return Err(Failure::Timeout(self.policy.timeout)),
      Ok(Err(e)) => return Err(classify_transport(e, self.policy.timeout)),
      Ok(Ok(response)) => response,
    };

    classify_response(response).await
  }
}

fn classify_transport(error: reqwest::Error, budget: Duration) -> Failure {
  if error.is_timeout() {
    Failure::Timeout(budget)
  } else {
    Failure::NetworkUnavailable(error.to_string())
  }
}

/// Split a response into success or a classified failure.
///
/// 401 is `Unauthorized`, 5xx is retryable, every other non-2xx status is
/// terminal. The body's error field is consulted exactly once for the kind.
pub async fn classify_response(response: reqwest::Response) -> Result<reqwest::Response, Failure> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  if status == reqwest::StatusCode::UNAUTHORIZED {
    return Err(Failure::Unauthorized);
  }

  let code = status.as_u16();
  let body: Value = response.json().await.unwrap_or(Value::Null);
  let kind = kind_from_body(&body, code);

  if code >= 500 {
    Err(Failure::ServerRetryable { status: code, kind })
  } else {
    Err(Failure::ServerTerminal { status: code, kind })
  }
}

fn kind_from_body(body: &Value, status: u16) -> FailureKind {
  let field = body
    .get("error")
    .or_else(|| body.get("detail"))
    .or_else(|| body.get("message"))
    .and_then(Value::as_str);

  if let Some(text) = field {
    let kind = FailureKind::from_error_field(text);
    if kind != FailureKind::Unknown {
      return kind;
    }
  }

  match status {
    503 => FailureKind::ServiceUnavailable,
    s if s >= 500 => FailureKind::ServerError,
    413 => FailureKind::PayloadTooLarge,
    _ => FailureKind::Unknown,
  }
}

/// Parse a response body that must be a JSON array.
pub async fn expect_json_array(response: reqwest::Response) -> Result<Vec<Value>, Failure> {
  let body: Value = response
    .json()
    .await
    .map_err(|e| Failure::MalformedResponse(format!("invalid JSON: {e}")))?;
  match body {
    Value::Array(items) => Ok(items),
    _ => Err(Failure::MalformedResponse("expected a JSON array".to_string())),
  }
}

/// Parse a response body as JSON.
pub async fn expect_json(response: reqwest::Response) -> Result<Value, Failure> {
  response.json().await.map_err(|e| Failure::MalformedResponse(format!("invalid JSON: {e}")))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_from_body_prefers_the_error_field() {
    let body = serde_json::json!({ "error": "No face detected" });
    assert_eq!(kind_from_body(&body, 400), FailureKind::NoFaceDetected);

    let detail = serde_json::json!({ "detail": "Payload too large" });
    assert_eq!(kind_from_body(&detail, 413), FailureKind::PayloadTooLarge);
  }

  #[test]
  fn kind_from_body_falls_back_to_status() {
    assert_eq!(kind_from_body(&Value::Null, 503), FailureKind::ServiceUnavailable);
    assert_eq!(kind_from_body(&Value::Null, 500), FailureKind::ServerError);
    assert_eq!(kind_from_body(&Value::Null, 413), FailureKind::PayloadTooLarge);
    assert_eq!(kind_from_body(&Value::Null, 400), FailureKind::Unknown);

    // An unrecognized error field still falls through to the status default
    let vague = serde_json::json!({ "error": "oops" });
    assert_eq!(kind_from_body(&vague, 503), FailureKind::ServiceUnavailable);
  }
}
