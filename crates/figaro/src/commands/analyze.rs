use std::path::PathBuf;

use anyhow::{Context, Result};
use marcel::analysis::{AnalysisClient, ImagePayload};

use crate::commands::{load_config, report};
use crate::display;

pub async fn handle(photo: PathBuf) -> Result<()> {
  let bytes =
    std::fs::read(&photo).with_context(|| format!("could not read {}", photo.display()))?;
  let image = ImagePayload::from_path_bytes(&photo, bytes);

  let config = load_config()?;
  let client = AnalysisClient::new(&config).map_err(report)?;

  sassoon::info("analyzing photo...");
  let mut observer = display::present_attempt;
  let result = client.analyze(&image, Some(&mut observer)).await.map_err(report)?;

  sassoon::success(&display::analysis_summary(&result));
  if result.recommendations.is_empty() {
    sassoon::info("no style recommendations came back");
    return Ok(());
  }

  println!();
  sassoon::headline("Recommended styles");
  for recommendation in &result.recommendations {
    println!("{}", display::recommendation_row(recommendation));
  }
  Ok(())
}
