use anyhow::Result;
use marcel::actions::ActionClient;

use crate::commands::{credentials, load_config, report};
use crate::display;

pub async fn handle(id: String, token: Option<String>) -> Result<()> {
  let config = load_config()?;
  let client = ActionClient::new(&config, credentials(token)).map_err(report)?;

  match client.toggle_like(&id).await.map_err(report)? {
    Some(status) => sassoon::success(&display::like_line(&status)),
    None => sassoon::info("a like for this style is already in flight"),
  }
  Ok(())
}
