//! Client configuration.
//!
//! Loaded from `config.json` under the config directory (overridable with
//! `MARCEL_CONFIG_DIR`), with every field defaulting independently so a
//! partial file only overrides what it names.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::failure::Failure;
use crate::request::RetryPolicy;

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "MARCEL_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
  /// Base URL of the catalog API.
  #[serde(default = "default_catalog_api_base")]
  pub catalog_api_base: String,
  /// Base URL of the face-analysis API.
  #[serde(default = "default_analysis_api_base")]
  pub analysis_api_base: String,
  /// Image-hosting upload endpoint.
  #[serde(default = "default_image_upload_endpoint")]
  pub image_upload_endpoint: String,
  /// Unsigned upload preset sent with every hosted upload.
  #[serde(default = "default_image_upload_preset")]
  pub image_upload_preset: String,
  /// Per-attempt request timeout, in milliseconds.
  #[serde(default = "default_request_timeout_ms")]
  pub request_timeout_ms: u64,
  /// Total attempts a retryable request gets.
  #[serde(default = "default_max_retry_attempts")]
  pub max_retry_attempts: u32,
  /// Delay before the second attempt; later delays double from here.
  #[serde(default = "default_retry_base_delay_ms")]
  pub retry_base_delay_ms: u64,
  /// Quiet period for search debouncing, in milliseconds.
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms: u64,
  /// How many related styles to surface on a detail view.
  #[serde(default = "default_related_items_limit")]
  pub related_items_limit: usize,
}

fn default_catalog_api_base() -> String {
  "https://api.strandhub.app/api".to_string()
}
fn default_analysis_api_base() -> String {
  "https://analysis.strandhub.app".to_string()
}
fn default_image_upload_endpoint() -> String {
  "https://api.cloudinary.com/v1_1/strandhub/image/upload".to_string()
}
fn default_image_upload_preset() -> String {
  "strandhub_unsigned".to_string()
}
fn default_request_timeout_ms() -> u64 {
  30_000
}
fn default_max_retry_attempts() -> u32 {
  3
}
fn default_retry_base_delay_ms() -> u64 {
  1_000
}
fn default_debounce_ms() -> u64 {
  300
}
fn default_related_items_limit() -> usize {
  8
}

impl Default for ClientConfig {
  fn default() -> Self {
    ClientConfig {
      catalog_api_base: default_catalog_api_base(),
      analysis_api_base: default_analysis_api_base(),
      image_upload_endpoint: default_image_upload_endpoint(),
      image_upload_preset: default_image_upload_preset(),
      request_timeout_ms: default_request_timeout_ms(),
      max_retry_attempts: default_max_retry_attempts(),
      retry_base_delay_ms: default_retry_base_delay_ms(),
      debounce_ms: default_debounce_ms(),
      related_items_limit: default_related_items_limit(),
    }
  }
}

impl ClientConfig {
  /// Load from the config directory, falling back to defaults when the file
  /// does not exist. A present-but-invalid file is an error, not a silent
  /// fallback.
  pub fn load() -> Result<Self, Failure> {
    match Self::config_path() {
      Some(path) if path.exists() => Self::load_from_file(&path),
      _ => Ok(ClientConfig::default()),
    }
  }

  pub fn load_from_file(path: &std::path::Path) -> Result<Self, Failure> {
    let content = std::fs::read_to_string(path)
      .map_err(|e| Failure::invalid(format!("could not read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
      .map_err(|e| Failure::invalid(format!("invalid config in {}: {e}", path.display())))
  }

  pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), Failure> {
    let content = serde_json::to_string_pretty(self)
      .map_err(|e| Failure::invalid(format!("could not serialize config: {e}")))?;
    std::fs::write(path, content)
      .map_err(|e| Failure::invalid(format!("could not write {}: {e}", path.display())))
  }

  /// `$MARCEL_CONFIG_DIR/config.json`, or `<config dir>/marcel/config.json`.
  pub fn config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
      if !dir.is_empty() {
        return Some(PathBuf::from(dir).join("config.json"));
      }
    }
    dirs::config_dir().map(|dir| dir.join("marcel").join("config.json"))
  }

  /// Reject configurations no client could act on.
  pub fn validate(&self) -> Result<(), Failure> {
    for (name, value) in [
      ("catalog_api_base", &self.catalog_api_base),
      ("analysis_api_base", &self.analysis_api_base),
      ("image_upload_endpoint", &self.image_upload_endpoint),
    ] {
      Url::parse(value).map_err(|e| Failure::invalid(format!("{name} is not a valid URL: {e}")))?;
    }
    if self.max_retry_attempts == 0 {
      return Err(Failure::invalid("max_retry_attempts must be at least 1"));
    }
    if self.request_timeout_ms == 0 {
      return Err(Failure::invalid("request_timeout_ms must be positive"));
    }
    Ok(())
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_millis(self.request_timeout_ms)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_attempts: self.max_retry_attempts,
      base_delay: Duration::from_millis(self.retry_base_delay_ms),
      timeout: self.timeout(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn defaults_match_documented_values() {
    let config = ClientConfig::default();
    assert_eq!(config.request_timeout_ms, 30_000);
    assert_eq!(config.max_retry_attempts, 3);
    assert_eq!(config.retry_base_delay_ms, 1_000);
    assert_eq!(config.debounce_ms, 300);
    assert_eq!(config.related_items_limit, 8);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn partial_file_only_overrides_named_fields() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{ "debounce_ms": 150 }"#).unwrap();

    let config = ClientConfig::load_from_file(&path).unwrap();
    assert_eq!(config.debounce_ms, 150);
    assert_eq!(config.max_retry_attempts, 3);
    assert_eq!(config.catalog_api_base, ClientConfig::default().catalog_api_base);
  }

  #[test]
  fn invalid_json_is_an_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, "{ nope }").unwrap();

    assert!(ClientConfig::load_from_file(&path).is_err());
  }

  #[test]
  fn save_and_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");

    let mut config = ClientConfig::default();
    config.max_retry_attempts = 5;
    config.catalog_api_base = "https://staging.strandhub.app/api".to_string();
    config.save_to_file(&path).unwrap();

    let loaded = ClientConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded.max_retry_attempts, 5);
    assert_eq!(loaded.catalog_api_base, "https://staging.strandhub.app/api");
  }

  #[test]
  fn validation_rejects_unusable_values() {
    let mut config = ClientConfig::default();
    config.catalog_api_base = "not a url".to_string();
    assert!(config.validate().is_err());

    let mut config = ClientConfig::default();
    config.max_retry_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = ClientConfig::default();
    config.request_timeout_ms = 0;
    assert!(config.validate().is_err());
  }

  #[test]
  fn retry_policy_reflects_the_config() {
    let mut config = ClientConfig::default();
    config.max_retry_attempts = 4;
    config.retry_base_delay_ms = 250;
    config.request_timeout_ms = 5_000;

    let policy = config.retry_policy();
    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.base_delay, Duration::from_millis(250));
    assert_eq!(policy.timeout, Duration::from_millis(5_000));
  }
}
