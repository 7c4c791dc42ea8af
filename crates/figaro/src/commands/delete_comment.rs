use anyhow::Result;
use marcel::actions::ActionClient;

use crate::commands::{credentials, load_config, report};

pub async fn handle(id: String, token: Option<String>) -> Result<()> {
  let config = load_config()?;
  let client = ActionClient::new(&config, credentials(token)).map_err(report)?;

  client.delete_comment(&id).await.map_err(report)?;
  sassoon::success("comment deleted");
  Ok(())
}
