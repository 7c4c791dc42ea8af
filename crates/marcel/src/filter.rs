//! The catalog filter engine.
//!
//! A compound of two independent predicates ANDed together: free-text search
//! over name and tags, and a category branch. Both are pure; the result keeps
//! the collection's order.

use chrono::{DateTime, Duration, Utc};

use crate::record::Haircut;

/// Items created within this many days count as "new".
pub const RECENT_WINDOW_DAYS: i64 = 14;

/// The active search term and category, owned by the page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
  pub search_term: String,
  pub category: String,
}

impl Default for FilterState {
  fn default() -> Self {
    FilterState { search_term: String::new(), category: "all".to_string() }
  }
}

impl FilterState {
  pub fn reset(&mut self) {
    *self = FilterState::default();
  }
}

enum CategoryFilter {
  All,
  Trending,
  New,
  Attribute(String),
}

fn parse_category(raw: &str) -> CategoryFilter {
  let category = raw.trim().to_lowercase();
  match category.as_str() {
    "" | "all" => CategoryFilter::All,
    "trending" => CategoryFilter::Trending,
    "new" => CategoryFilter::New,
    _ => CategoryFilter::Attribute(category),
  }
}

/// Apply the compound filter to a collection.
///
/// Returns references into the input in the input's order; never mutates.
/// An attribute category matching no record yields an empty result rather
/// than falling back to "all" — unrecognized filters fail closed.
pub fn apply_filters<'a>(collection: &'a [Haircut], state: &FilterState) -> Vec<&'a Haircut> {
  apply_filters_at(collection, state, Utc::now())
}

/// Same as [`apply_filters`] with an explicit "now" for the recency branch.
pub fn apply_filters_at<'a>(
  collection: &'a [Haircut],
  state: &FilterState,
  now: DateTime<Utc>,
) -> Vec<&'a Haircut> {
  let term = state.search_term.trim().to_lowercase();
  let category = parse_category(&state.category);

  collection
    .iter()
    .filter(|item| matches_search(item, &term) && matches_category(item, &category, now))
    .collect()
}

fn matches_search(item: &Haircut, term: &str) -> bool {
  if term.is_empty() {
    return true;
  }
  let name = item.name.as_deref().unwrap_or("").to_lowercase();
  if name.contains(term) {
    return true;
  }
  item.tags.join(" ").to_lowercase().contains(term)
}

fn matches_category(item: &Haircut, category: &CategoryFilter, now: DateTime<Utc>) -> bool {
  match category {
    CategoryFilter::All => true,
    CategoryFilter::Trending => item.is_trending,
    CategoryFilter::New => item.created_at >= now - Duration::days(RECENT_WINDOW_DAYS),
    CategoryFilter::Attribute(value) => {
      item.face_shape.iter().any(|s| s.eq_ignore_ascii_case(value))
        || item.hair_type.iter().any(|s| s.eq_ignore_ascii_case(value))
        || item.hair_length.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(value))
        || item.style_type.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(value))
    }
  }
}
