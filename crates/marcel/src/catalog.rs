//! Read-only access to the catalog API.

use crate::config::ClientConfig;
use crate::failure::Failure;
use crate::record::{Comment, Haircut, LikeStatus};
use crate::request::{expect_json, expect_json_array, RequestClient};

pub struct CatalogClient {
  request: RequestClient,
  base: String,
}

impl CatalogClient {
  pub fn new(config: &ClientConfig) -> Result<Self, Failure> {
    config.validate()?;
    Ok(CatalogClient {
      request: RequestClient::new(config.retry_policy())?,
      base: config.catalog_api_base.trim_end_matches('/').to_string(),
    })
  }

  /// Fetch the whole collection and normalize every element.
  ///
  /// A non-array body is a defined failure ("malformed collection"), never a
  /// crash; duplicate ids pass through untouched.
  pub async fn fetch_haircuts(&self) -> Result<Vec<Haircut>, Failure> {
    let url = format!("{}/haircuts", self.base);
    let response = self.request.execute(|| Ok(self.request.http().get(&url)), None).await?;
    let items = expect_json_array(response)
      .await
      .map_err(|_| Failure::MalformedResponse("malformed collection".to_string()))?;
    Ok(Haircut::from_array(&items))
  }

  /// Like state for one haircut. The bearer header is optional here; without
  /// it the server reports `has_liked: false` with the public count.
  pub async fn like_status(
    &self,
    haircut_id: &str,
    token: Option<&str>,
  ) -> Result<LikeStatus, Failure> {
    let url = format!("{}/haircuts/{}/like-status", self.base, haircut_id);
    let response = self
      .request
      .execute(
        || {
          let mut builder = self.request.http().get(&url);
          if let Some(token) = token {
            builder = builder.bearer_auth(token);
          }
          Ok(builder)
        },
        None,
      )
      .await?;
    let body = expect_json(response).await?;
    serde_json::from_value(body)
      .map_err(|e| Failure::MalformedResponse(format!("invalid like status: {e}")))
  }

  /// All comments for one haircut, newest-first as served.
  pub async fn comments(&self, haircut_id: &str) -> Result<Vec<Comment>, Failure> {
    let url = format!("{}/comments/{}", self.base, haircut_id);
    let response = self.request.execute(|| Ok(self.request.http().get(&url)), None).await?;
    let items = expect_json_array(response).await?;
    Ok(Comment::from_array(&items))
  }
}
