//! Credential access for authenticated calls.
//!
//! Tokens are short-lived and may rotate underneath us, so clients ask the
//! provider for a fresh one on every write instead of caching. The provider
//! itself is external; this crate only defines the seam.

use async_trait::async_trait;

use crate::failure::Failure;

/// Source of bearer credentials. `Ok(None)` means "not signed in" and is a
/// locally handled condition, not an error.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
  async fn fresh_token(&self) -> Result<Option<String>, Failure>;
}

/// Reads the token from an environment variable on every call, so an
/// out-of-band refresh is picked up without restarting.
pub struct EnvCredentialProvider {
  var: String,
}

impl EnvCredentialProvider {
  pub fn new(var: impl Into<String>) -> Self {
    EnvCredentialProvider { var: var.into() }
  }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
  async fn fresh_token(&self) -> Result<Option<String>, Failure> {
    Ok(std::env::var(&self.var).ok().filter(|token| !token.is_empty()))
  }
}

/// A fixed token (or a fixed signed-out state). Used by the CLI when a token
/// is passed explicitly, and by tests.
pub struct StaticCredentialProvider {
  token: Option<String>,
}

impl StaticCredentialProvider {
  pub fn new(token: Option<String>) -> Self {
    StaticCredentialProvider { token: token.filter(|t| !t.is_empty()) }
  }

  pub fn signed_out() -> Self {
    StaticCredentialProvider { token: None }
  }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
  async fn fresh_token(&self) -> Result<Option<String>, Failure> {
    Ok(self.token.clone())
  }
}
