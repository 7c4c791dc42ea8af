use anyhow::Result;
use marcel::actions::ActionClient;

use crate::commands::{credentials, load_config, report};

pub async fn handle(id: String, text: String, token: Option<String>) -> Result<()> {
  let config = load_config()?;
  let client = ActionClient::new(&config, credentials(token)).map_err(report)?;

  client.edit_comment(&id, &text).await.map_err(report)?;
  sassoon::success("comment updated");
  Ok(())
}
