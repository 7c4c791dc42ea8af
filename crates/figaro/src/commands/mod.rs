//! Command handlers. Each one builds the clients it needs from the loaded
//! configuration, does its work, and reports through sassoon.

pub mod analyze;
pub mod browse;
pub mod comment;
pub mod comments;
pub mod delete_comment;
pub mod edit_comment;
pub mod like;
pub mod profile;
pub mod show;

use std::sync::Arc;

use anyhow::Result;
use marcel::auth::{CredentialProvider, EnvCredentialProvider, StaticCredentialProvider};
use marcel::failure::Failure;
use marcel::ClientConfig;

use crate::display;

pub(crate) fn load_config() -> Result<ClientConfig> {
  Ok(ClientConfig::load()?)
}

/// An explicit `--token` wins; otherwise the token is re-read from the
/// environment on every request so rotation is picked up.
pub(crate) fn credentials(token: Option<String>) -> Arc<dyn CredentialProvider> {
  match token {
    Some(token) => Arc::new(StaticCredentialProvider::new(Some(token))),
    None => Arc::new(EnvCredentialProvider::new("FIGARO_TOKEN")),
  }
}

/// Print the advice for a failure, then hand it to anyhow for the exit path.
pub(crate) fn report(failure: Failure) -> anyhow::Error {
  display::present_failure(&failure);
  anyhow::Error::new(failure)
}
