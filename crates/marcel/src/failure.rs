//! The closed failure taxonomy shared by every client in this crate.
//!
//! Failures are classified exactly once, at the network boundary. Callers
//! branch on the variant (or on [`FailureKind`]) and never re-parse message
//! text.

use std::time::Duration;

/// Fine-grained classification derived from an error response body or the
/// transport error, used to pick a user-facing advice entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  NoFaceDetected,
  PoorImageQuality,
  InvalidFormat,
  PayloadTooLarge,
  ServerError,
  ServiceUnavailable,
  Timeout,
  ConnectionError,
  Unknown,
}

/// A ready-to-display description of a failure: title, message, next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
  pub title: &'static str,
  pub message: &'static str,
  pub suggestion: &'static str,
}

impl FailureKind {
  /// Match a server error field (`error`, `detail` or `message`) against the
  /// known error vocabulary. Unrecognized text maps to `Unknown`.
  pub fn from_error_field(text: &str) -> Self {
    let lower = text.to_lowercase();
    if lower.contains("no face") {
      FailureKind::NoFaceDetected
    } else if lower.contains("image quality") {
      FailureKind::PoorImageQuality
    } else if lower.contains("invalid image format") || lower.contains("unsupported format") {
      FailureKind::InvalidFormat
    } else if lower.contains("too large") {
      FailureKind::PayloadTooLarge
    } else if lower.contains("service unavailable") || lower.contains("temporarily unavailable") {
      FailureKind::ServiceUnavailable
    } else if lower.contains("server error") {
      FailureKind::ServerError
    } else {
      FailureKind::Unknown
    }
  }

  /// The fixed presentation table. Every kind resolves to a non-empty
  /// title, message and suggested next action.
  pub fn advice(self) -> Advice {
    match self {
      FailureKind::NoFaceDetected => Advice {
        title: "No Face Detected",
        message: "We couldn't detect a face in the image.",
        suggestion: "Try a clear photo with your face visible from the front.",
      },
      FailureKind::PoorImageQuality => Advice {
        title: "Poor Image Quality",
        message: "The image is too blurry or low resolution for analysis.",
        suggestion: "Use a well-lit photo with clear facial features.",
      },
      FailureKind::InvalidFormat => Advice {
        title: "Invalid Image Format",
        message: "Only JPEG and PNG images are supported.",
        suggestion: "Convert your image to JPEG or PNG and try again.",
      },
      FailureKind::PayloadTooLarge => Advice {
        title: "File Too Large",
        message: "The image file exceeds the 10MB limit.",
        suggestion: "Compress your image and try again.",
      },
      FailureKind::ServerError => Advice {
        title: "Server Error",
        message: "An unexpected error occurred on the server.",
        suggestion: "Try again later or contact support.",
      },
      FailureKind::ServiceUnavailable => Advice {
        title: "Service Unavailable",
        message: "The service is temporarily unavailable.",
        suggestion: "Try again in a few moments.",
      },
      FailureKind::Timeout => Advice {
        title: "Request Timeout",
        message: "The request took too long to complete.",
        suggestion: "Try again, or use a smaller image file.",
      },
      FailureKind::ConnectionError => Advice {
        title: "Connection Error",
        message: "Could not connect to the server.",
        suggestion: "Check your internet connection and try again.",
      },
      FailureKind::Unknown => Advice {
        title: "Something Went Wrong",
        message: "The request could not be completed.",
        suggestion: "Try again or contact support.",
      },
    }
  }
}

/// Every way a client operation can fail.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
  /// The connection itself failed; no HTTP response was observed.
  #[error("could not reach the server: {0}")]
  NetworkUnavailable(String),

  /// An attempt exceeded its time budget and was aborted.
  #[error("request timed out after {0:?}")]
  Timeout(Duration),

  /// The response arrived but was not the shape the contract requires.
  #[error("malformed response: {0}")]
  MalformedResponse(String),

  /// HTTP 401. The caller must transition to a signed-out state.
  #[error("unauthorized")]
  Unauthorized,

  /// A local precondition failed; no request was issued.
  #[error("{message}")]
  ValidationFailed { message: String, kind: FailureKind },

  /// A non-retryable HTTP error status (4xx other than 401).
  #[error("server rejected the request: HTTP {status}")]
  ServerTerminal { status: u16, kind: FailureKind },

  /// A retryable HTTP error status (5xx).
  #[error("server failed: HTTP {status}")]
  ServerRetryable { status: u16, kind: FailureKind },

  /// A referenced id is absent from the collection.
  #[error("{0} not found")]
  NotFound(String),
}

impl Failure {
  /// Local precondition failure with no particular presentation kind.
  pub fn invalid(message: impl Into<String>) -> Self {
    Failure::ValidationFailed { message: message.into(), kind: FailureKind::Unknown }
  }

  /// Local precondition failure with a presentation kind attached.
  pub fn invalid_kind(message: impl Into<String>, kind: FailureKind) -> Self {
    Failure::ValidationFailed { message: message.into(), kind }
  }

  /// Only timeouts and 5xx responses are worth another attempt.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Failure::Timeout(_) | Failure::ServerRetryable { .. })
  }

  pub fn kind(&self) -> FailureKind {
    match self {
      Failure::NetworkUnavailable(_) => FailureKind::ConnectionError,
      Failure::Timeout(_) => FailureKind::Timeout,
      Failure::ServerTerminal { kind, .. } | Failure::ServerRetryable { kind, .. } => *kind,
      Failure::ValidationFailed { kind, .. } => *kind,
      _ => FailureKind::Unknown,
    }
  }

  /// Presentation advice for this failure. Variants without a kind of their
  /// own carry fixed entries here.
  pub fn advice(&self) -> Advice {
    match self {
      Failure::Unauthorized => Advice {
        title: "Session Expired",
        message: "Your session is no longer valid.",
        suggestion: "Sign in again to continue.",
      },
      Failure::MalformedResponse(_) => Advice {
        title: "Unexpected Response",
        message: "The server returned data we couldn't understand.",
        suggestion: "Try again later.",
      },
      Failure::NotFound(_) => Advice {
        title: "Not Found",
        message: "That style doesn't exist in the catalog.",
        suggestion: "Go back and pick another style.",
      },
      Failure::ValidationFailed { kind: FailureKind::Unknown, .. } => Advice {
        title: "Check Your Input",
        message: "The request was not sent.",
        suggestion: "Fix the highlighted problem and try again.",
      },
      other => other.kind().advice(),
    }
  }
}
