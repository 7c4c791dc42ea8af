//! Canonical record shapes and the normalization boundary.
//!
//! The catalog API serves heterogeneous JSON: ids appear as bare strings or
//! as Mongo `{ "$oid": ... }` wrappers, dates as RFC 3339 strings, epoch
//! milliseconds or `{ "$date": ... }` wrappers, and multi-valued attributes
//! sometimes as a single string. Everything is normalized here, once, on
//! ingest; downstream code never re-inspects raw shapes.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One catalog entry describing a hairstyle and its applicability attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Haircut {
  /// Canonical string id, or `None` when the source carries no recoverable id.
  pub id: Option<String>,
  pub name: Option<String>,
  pub image_url: Option<String>,
  pub tags: Vec<String>,
  pub face_shape: Vec<String>,
  pub hair_type: Vec<String>,
  pub hair_length: Option<String>,
  pub style_type: Option<String>,
  pub is_trending: bool,
  pub created_at: DateTime<Utc>,
}

/// A comment on a haircut, owned by the user who wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
  pub id: Option<String>,
  pub user_id: String,
  pub user_name: String,
  pub user_photo: Option<String>,
  pub text: String,
  pub created_at: DateTime<Utc>,
  pub haircut_id: Option<String>,
}

/// Like state for one haircut as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LikeStatus {
  #[serde(rename = "hasLiked", alias = "liked", default)]
  pub has_liked: bool,
  #[serde(rename = "likesCount", default)]
  pub likes_count: i64,
}

/// Extract a canonical string id from a raw value.
///
/// Accepts `null` (→ `None`), a bare string, a number, or an object exposing
/// `$oid`, `_id` or `id` in that precedence order. Pure and total: no input
/// makes it fail, and the same input always maps to the same output.
pub fn normalize_id(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Object(map) => {
      if let Some(Value::String(oid)) = map.get("$oid") {
        return Some(oid.clone());
      }
      if let Some(inner) = map.get("_id") {
        return normalize_id(inner);
      }
      if let Some(inner) = map.get("id") {
        return normalize_id(inner);
      }
      None
    }
    _ => None,
  }
}

/// Resolve a raw timestamp to UTC, unwrapping `{ "$date": ... }` if present.
///
/// Invalid or missing input resolves to the Unix epoch sentinel so downstream
/// sorting and comparison never fail.
pub fn normalize_date(value: &Value) -> DateTime<Utc> {
  let raw = match value {
    Value::Object(map) => map.get("$date").unwrap_or(&Value::Null),
    other => other,
  };

  match raw {
    Value::String(s) => DateTime::parse_from_rfc3339(s)
      .map(|parsed| parsed.with_timezone(&Utc))
      .unwrap_or(DateTime::UNIX_EPOCH),
    Value::Number(n) => n
      .as_i64()
      .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
      .unwrap_or(DateTime::UNIX_EPOCH),
    _ => DateTime::UNIX_EPOCH,
  }
}

pub(crate) fn string_field(raw: &Value, key: &str) -> Option<String> {
  raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Read a multi-valued attribute, tolerating a single bare string.
pub(crate) fn string_list(raw: &Value, key: &str) -> Vec<String> {
  match raw.get(key) {
    Some(Value::Array(items)) => {
      items.iter().filter_map(Value::as_str).map(str::to_string).collect()
    }
    Some(Value::String(s)) => vec![s.clone()],
    _ => Vec::new(),
  }
}

impl Haircut {
  /// Normalize one raw catalog element. Never fails: unrecognized or missing
  /// fields degrade to their defaults.
  pub fn from_value(raw: &Value) -> Self {
    Haircut {
      id: normalize_id(raw),
      name: string_field(raw, "name").or_else(|| string_field(raw, "title")),
      image_url: string_field(raw, "imageUrl").or_else(|| string_field(raw, "image")),
      tags: string_list(raw, "tags"),
      face_shape: string_list(raw, "faceShape"),
      hair_type: string_list(raw, "hairType"),
      hair_length: string_field(raw, "hairLength"),
      style_type: string_field(raw, "styleType"),
      is_trending: raw.get("isTrending").and_then(Value::as_bool).unwrap_or(false),
      created_at: normalize_date(raw.get("createdAt").unwrap_or(&Value::Null)),
    }
  }

  /// Normalize a whole fetched collection, preserving server order.
  pub fn from_array(values: &[Value]) -> Vec<Self> {
    values.iter().map(Self::from_value).collect()
  }
}

impl Comment {
  pub fn from_value(raw: &Value) -> Self {
    Comment {
      id: normalize_id(raw),
      user_id: string_field(raw, "userId").unwrap_or_default(),
      user_name: string_field(raw, "userName").unwrap_or_else(|| "Anonymous".to_string()),
      user_photo: string_field(raw, "userPhoto"),
      text: string_field(raw, "text").unwrap_or_default(),
      created_at: normalize_date(raw.get("createdAt").unwrap_or(&Value::Null)),
      haircut_id: raw.get("haircutId").and_then(|v| normalize_id(v)),
    }
  }

  pub fn from_array(values: &[Value]) -> Vec<Self> {
    values.iter().map(Self::from_value).collect()
  }
}
