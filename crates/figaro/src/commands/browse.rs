use anyhow::Result;
use marcel::catalog::CatalogClient;
use marcel::session::CatalogSession;

use crate::commands::{load_config, report};
use crate::display;

pub async fn handle(search: Option<String>, category: Option<String>) -> Result<()> {
  let config = load_config()?;
  let client = CatalogClient::new(&config).map_err(report)?;
  let haircuts = client.fetch_haircuts().await.map_err(report)?;

  let mut session = CatalogSession::new(haircuts, config.related_items_limit);
  if let Some(search) = search {
    session.set_search(search);
  }
  if let Some(category) = category {
    session.set_category(category);
  }

  let filtered = session.filtered();
  if filtered.is_empty() {
    sassoon::info("no styles match those filters");
    return Ok(());
  }

  for haircut in &filtered {
    println!("{}", display::style_row(haircut));
  }
  sassoon::success(&format!("{} of {} styles", filtered.len(), session.collection().len()));
  Ok(())
}
