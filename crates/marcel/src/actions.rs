//! Bearer-authenticated mutations: likes, comments, profile reads.
//!
//! Every write fetches a fresh token (tokens rotate), runs as a single
//! attempt (writes are not idempotent), and funnels 401 through one recovery
//! path: drop the local "signed in" state, tell the consumer, surface
//! `Unauthorized`, never auto-retry.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;

use crate::auth::CredentialProvider;
use crate::config::ClientConfig;
use crate::failure::Failure;
use crate::record::{Comment, Haircut, LikeStatus};
use crate::request::{expect_json, expect_json_array, RequestClient, RetryPolicy};

/// Minimum comment length enforced before any request is attempted.
pub const MIN_COMMENT_CHARS: usize = 5;

pub struct ActionClient {
  /// Retrying client for idempotent authenticated reads.
  request: RequestClient,
  /// Single-attempt client for writes, sharing the connection pool.
  mutate: RequestClient,
  base: String,
  credentials: Arc<dyn CredentialProvider>,
  pending_likes: Mutex<HashSet<String>>,
  signed_in: AtomicBool,
  on_signed_out: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Releases the per-haircut pending flag when dropped, so a failed or
/// panicked request can never leave the guard held.
struct PendingGuard<'a> {
  set: &'a Mutex<HashSet<String>>,
  id: String,
}

impl<'a> PendingGuard<'a> {
  fn acquire(set: &'a Mutex<HashSet<String>>, id: &str) -> Option<Self> {
    let mut pending = lock(set);
    if !pending.insert(id.to_string()) {
      return None;
    }
    Some(PendingGuard { set, id: id.to_string() })
  }
}

impl Drop for PendingGuard<'_> {
  fn drop(&mut self) {
    lock(self.set).remove(&self.id);
  }
}

fn lock<'a>(set: &'a Mutex<HashSet<String>>) -> MutexGuard<'a, HashSet<String>> {
  match set.lock() {
    Ok(guard) => guard,
    Err(poisoned) => poisoned.into_inner(),
  }
}

impl ActionClient {
  pub fn new(
    config: &ClientConfig,
    credentials: Arc<dyn CredentialProvider>,
  ) -> Result<Self, Failure> {
    config.validate()?;
    let request = RequestClient::new(config.retry_policy())?;
    let mutate = request.with_policy(RetryPolicy::single_attempt(config.timeout()));
    Ok(ActionClient {
      request,
      mutate,
      base: config.catalog_api_base.trim_end_matches('/').to_string(),
      credentials,
      pending_likes: Mutex::new(HashSet::new()),
      signed_in: AtomicBool::new(true),
      on_signed_out: None,
    })
  }

  /// Register a callback invoked when a 401 invalidates the session, so the
  /// consumer can re-render as logged out.
  pub fn on_signed_out(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
    self.on_signed_out = Some(Box::new(callback));
    self
  }

  pub fn is_signed_in(&self) -> bool {
    self.signed_in.load(Ordering::SeqCst)
  }

  async fn bearer(&self) -> Result<String, Failure> {
    match self.credentials.fresh_token().await? {
      Some(token) => Ok(token),
      None => Err(Failure::invalid("sign in to continue")),
    }
  }

  fn surface(&self, failure: Failure) -> Failure {
    if matches!(failure, Failure::Unauthorized) {
      self.signed_in.store(false, Ordering::SeqCst);
      if let Some(callback) = &self.on_signed_out {
        callback();
      }
    }
    failure
  }

  /// Toggle the like on a haircut.
  ///
  /// At most one toggle per haircut is in flight at a time: a concurrent
  /// duplicate returns `Ok(None)` immediately without issuing a request.
  pub async fn toggle_like(&self, haircut_id: &str) -> Result<Option<LikeStatus>, Failure> {
    let Some(_guard) = PendingGuard::acquire(&self.pending_likes, haircut_id) else {
      tracing::debug!(haircut_id, "like toggle already pending, ignoring");
      return Ok(None);
    };

    let token = self.bearer().await.map_err(|f| self.surface(f))?;
    let url = format!("{}/haircuts/{}/like", self.base, haircut_id);

    let result = async {
      let response =
        self.mutate.execute(|| Ok(self.mutate.http().post(&url).bearer_auth(&token)), None).await?;
      let body = expect_json(response).await?;
      serde_json::from_value::<LikeStatus>(body)
        .map_err(|e| Failure::MalformedResponse(format!("invalid like response: {e}")))
    }
    .await;

    result.map(Some).map_err(|f| self.surface(f))
  }

  /// Post a comment. Text shorter than [`MIN_COMMENT_CHARS`] is rejected
  /// locally, before any network traffic.
  pub async fn add_comment(&self, haircut_id: &str, text: &str) -> Result<Comment, Failure> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_COMMENT_CHARS {
      return Err(Failure::invalid(format!(
        "comments must be at least {MIN_COMMENT_CHARS} characters"
      )));
    }

    let token = self.bearer().await?;
    let url = format!("{}/comments", self.base);
    let payload = json!({ "haircutId": haircut_id, "text": trimmed });

    let result = async {
      let response = self
        .mutate
        .execute(|| Ok(self.mutate.http().post(&url).bearer_auth(&token).json(&payload)), None)
        .await?;
      let body = expect_json(response).await?;
      Ok(Comment::from_value(&body))
    }
    .await;

    result.map_err(|f| self.surface(f))
  }

  /// Replace a comment's text. Ownership is enforced server-side; hiding the
  /// edit affordance for other users is UX, not a security boundary.
  pub async fn edit_comment(&self, comment_id: &str, text: &str) -> Result<(), Failure> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      return Err(Failure::invalid("comment text must not be empty"));
    }

    let token = self.bearer().await?;
    let url = format!("{}/comments/{}", self.base, comment_id);
    let payload = json!({ "text": trimmed });

    let result = self
      .mutate
      .execute(|| Ok(self.mutate.http().put(&url).bearer_auth(&token).json(&payload)), None)
      .await;

    result.map(|_| ()).map_err(|f| self.surface(f))
  }

  pub async fn delete_comment(&self, comment_id: &str) -> Result<(), Failure> {
    let token = self.bearer().await?;
    let url = format!("{}/comments/{}", self.base, comment_id);

    let result =
      self.mutate.execute(|| Ok(self.mutate.http().delete(&url).bearer_auth(&token)), None).await;

    result.map(|_| ()).map_err(|f| self.surface(f))
  }

  /// Haircuts the signed-in user has liked.
  pub async fn my_likes(&self) -> Result<Vec<Haircut>, Failure> {
    let token = self.bearer().await?;
    let url = format!("{}/users/me/likes", self.base);

    let result = async {
      let response =
        self.request.execute(|| Ok(self.request.http().get(&url).bearer_auth(&token)), None).await?;
      let items = expect_json_array(response).await?;
      Ok(Haircut::from_array(&items))
    }
    .await;

    result.map_err(|f| self.surface(f))
  }

  /// Comments the signed-in user has written.
  pub async fn my_comments(&self) -> Result<Vec<Comment>, Failure> {
    let token = self.bearer().await?;
    let url = format!("{}/users/me/comments", self.base);

    let result = async {
      let response =
        self.request.execute(|| Ok(self.request.http().get(&url).bearer_auth(&token)), None).await?;
      let items = expect_json_array(response).await?;
      Ok(Comment::from_array(&items))
    }
    .await;

    result.map_err(|f| self.surface(f))
  }

  /// Load both halves of the profile page in parallel. Each request follows
  /// its own retry timeline; the join fails as soon as either side does.
  pub async fn load_profile(&self) -> Result<(Vec<Haircut>, Vec<Comment>), Failure> {
    futures::try_join!(self.my_likes(), self.my_comments())
  }

  /// Tell the backend about the signed-in identity after login.
  pub async fn sync_user(&self) -> Result<(), Failure> {
    let token = self.bearer().await?;
    let url = format!("{}/users/sync", self.base);

    let result =
      self.mutate.execute(|| Ok(self.mutate.http().post(&url).bearer_auth(&token)), None).await;

    result.map(|_| ()).map_err(|f| self.surface(f))
  }
}
