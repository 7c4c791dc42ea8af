use anyhow::Result;
use marcel::catalog::CatalogClient;
use marcel::session::CatalogSession;

use crate::commands::{load_config, report};
use crate::display;

pub async fn handle(id: String) -> Result<()> {
  let config = load_config()?;
  let client = CatalogClient::new(&config).map_err(report)?;
  let haircuts = client.fetch_haircuts().await.map_err(report)?;
  let session = CatalogSession::new(haircuts, config.related_items_limit);

  let haircut = session.find(&id).map_err(report)?;
  println!("{}", display::style_card(haircut));

  if let Ok(status) = client.like_status(&id, None).await {
    println!("likes:       {}", status.likes_count);
  }

  let related = session.related(&id).map_err(report)?;
  if !related.is_empty() {
    println!();
    sassoon::headline("You might also like");
    for candidate in related {
      println!("{}", display::style_row(candidate));
    }
  }
  Ok(())
}
