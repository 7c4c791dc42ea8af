//! Per-page-session state over a fetched collection.
//!
//! A [`CatalogSession`] is constructed explicitly when a page session starts
//! and owns both the collection and the active filters; there is no global
//! state. All reads are views into the owned collection.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::failure::Failure;
use crate::filter::{apply_filters, FilterState};
use crate::record::Haircut;
use crate::related::find_related;

pub struct CatalogSession {
  collection: Vec<Haircut>,
  filters: FilterState,
  related_limit: usize,
}

impl CatalogSession {
  pub fn new(collection: Vec<Haircut>, related_limit: usize) -> Self {
    CatalogSession { collection, filters: FilterState::default(), related_limit }
  }

  pub fn collection(&self) -> &[Haircut] {
    &self.collection
  }

  pub fn filters(&self) -> &FilterState {
    &self.filters
  }

  pub fn set_search(&mut self, term: impl Into<String>) {
    self.filters.search_term = term.into();
  }

  pub fn set_category(&mut self, category: impl Into<String>) {
    self.filters.category = category.into();
  }

  pub fn reset_filters(&mut self) {
    self.filters.reset();
  }

  /// The collection under the active filters, in collection order.
  pub fn filtered(&self) -> Vec<&Haircut> {
    apply_filters(&self.collection, &self.filters)
  }

  /// Look up one style by normalized id.
  pub fn find(&self, id: &str) -> Result<&Haircut, Failure> {
    self
      .collection
      .iter()
      .find(|haircut| haircut.id.as_deref() == Some(id))
      .ok_or_else(|| Failure::NotFound(format!("style {id}")))
  }

  /// Styles related to the given id, cut at the session's limit.
  pub fn related(&self, id: &str) -> Result<Vec<&Haircut>, Failure> {
    let current = self.find(id)?;
    Ok(find_related(current, &self.collection, self.related_limit))
  }

  /// The n most recently added styles, newest first. Ties keep collection
  /// order.
  pub fn newest(&self, n: usize) -> Vec<&Haircut> {
    let mut sorted: Vec<&Haircut> = self.collection.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(n);
    sorted
  }

  /// The first n styles flagged as trending, in collection order.
  pub fn trending(&self, n: usize) -> Vec<&Haircut> {
    self.collection.iter().filter(|haircut| haircut.is_trending).take(n).collect()
  }
}

/// Trailing-edge debouncer for search input.
///
/// Each schedule aborts the previously scheduled work, so only the last call
/// in a burst ever executes, and only after the quiet period has elapsed.
pub struct Debouncer {
  quiet: Duration,
  pending: Option<JoinHandle<()>>,
}

impl Debouncer {
  pub fn new(quiet: Duration) -> Self {
    Debouncer { quiet, pending: None }
  }

  pub fn schedule<F, Fut>(&mut self, work: F)
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
  {
    if let Some(previous) = self.pending.take() {
      previous.abort();
    }
    let quiet = self.quiet;
    self.pending = Some(tokio::spawn(async move {
      tokio::time::sleep(quiet).await;
      work().await;
    }));
  }

  /// Drop any scheduled work without running it.
  pub fn cancel(&mut self) {
    if let Some(previous) = self.pending.take() {
      previous.abort();
    }
  }
}

impl Drop for Debouncer {
  fn drop(&mut self) {
    self.cancel();
  }
}
