use anyhow::Result;
use marcel::catalog::CatalogClient;

use crate::commands::{load_config, report};
use crate::display;

pub async fn handle(id: String) -> Result<()> {
  let config = load_config()?;
  let client = CatalogClient::new(&config).map_err(report)?;

  let comments = client.comments(&id).await.map_err(report)?;
  if comments.is_empty() {
    sassoon::info("no comments yet");
    return Ok(());
  }

  for comment in &comments {
    println!("{}", display::comment_line(comment));
  }
  sassoon::success(&format!("{} comments", comments.len()));
  Ok(())
}
