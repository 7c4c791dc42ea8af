use anyhow::Result;
use marcel::actions::ActionClient;

use crate::commands::{credentials, load_config, report};
use crate::display;

pub async fn handle(token: Option<String>) -> Result<()> {
  let config = load_config()?;
  let client = ActionClient::new(&config, credentials(token)).map_err(report)?;

  let (likes, comments) = client.load_profile().await.map_err(report)?;

  sassoon::headline("Liked styles");
  if likes.is_empty() {
    sassoon::info("you haven't liked any styles yet");
  }
  for haircut in &likes {
    println!("{}", display::style_row(haircut));
  }

  println!();
  sassoon::headline("Your comments");
  if comments.is_empty() {
    sassoon::info("you haven't commented yet");
  }
  for comment in &comments {
    println!("{}", display::comment_line(comment));
  }
  Ok(())
}
