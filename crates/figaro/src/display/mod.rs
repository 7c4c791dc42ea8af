//! Terminal rendering for catalog data. Formatters return strings; only the
//! small `present_*` helpers actually print.

use chrono::{DateTime, Local, Utc};
use colored::*;
use console::truncate_str;

use marcel::analysis::{AnalysisReport, RecommendedStyle};
use marcel::failure::Failure;
use marcel::record::{Comment, Haircut, LikeStatus};
use marcel::request::{AttemptEvent, AttemptStatus};

/// Convert a UTC timestamp to a readable local-time string.
pub fn format_timestamp(utc_time: DateTime<Utc>) -> String {
  let local_time: DateTime<Local> = utc_time.into();
  local_time.format("%B %d, %Y at %I:%M %p").to_string()
}

/// One line per style for list output.
pub fn style_row(haircut: &Haircut) -> String {
  let id = haircut.id.as_deref().unwrap_or("-");
  let name = haircut.name.as_deref().unwrap_or("Untitled");
  let mut row = format!("{:<26} {}", id.dimmed(), name.bold());

  if haircut.is_trending {
    row.push_str(&format!(" {}", "▲ trending".yellow()));
  }
  if !haircut.tags.is_empty() {
    let tags = haircut.tags.join(", ");
    row.push_str(&format!("  [{}]", truncate_str(&tags, 40, "…")));
  }
  row
}

/// Full details for one style.
pub fn style_card(haircut: &Haircut) -> String {
  let mut lines = Vec::new();
  lines.push(format!("{}", haircut.name.as_deref().unwrap_or("Untitled").bold()));
  if let Some(id) = &haircut.id {
    lines.push(format!("id:          {id}"));
  }
  if !haircut.face_shape.is_empty() {
    lines.push(format!("face shapes: {}", haircut.face_shape.join(", ")));
  }
  if !haircut.hair_type.is_empty() {
    lines.push(format!("hair types:  {}", haircut.hair_type.join(", ")));
  }
  if let Some(length) = &haircut.hair_length {
    lines.push(format!("length:      {length}"));
  }
  if let Some(style_type) = &haircut.style_type {
    lines.push(format!("style:       {style_type}"));
  }
  if !haircut.tags.is_empty() {
    lines.push(format!("tags:        {}", haircut.tags.join(", ")));
  }
  if let Some(url) = &haircut.image_url {
    lines.push(format!("image:       {url}"));
  }
  lines.push(format!("added:       {}", format_timestamp(haircut.created_at)));
  lines.join("\n")
}

pub fn comment_line(comment: &Comment) -> String {
  format!(
    "{} {} {}",
    comment.user_name.bold(),
    format_timestamp(comment.created_at).dimmed(),
    comment.text
  )
}

pub fn like_line(status: &LikeStatus) -> String {
  let verb = if status.has_liked { "liked" } else { "unliked" };
  format!("{verb} ({} likes now)", status.likes_count)
}

pub fn recommendation_row(style: &RecommendedStyle) -> String {
  let percent = (style.match_score * 100.0).round() as i64;
  let mut row = format!("{:>3}%  {}", percent, style.name.bold());
  if let Some(difficulty) = &style.difficulty {
    row.push_str(&format!("  ({difficulty})"));
  }
  if !style.tags.is_empty() {
    row.push_str(&format!("  [{}]", style.tags.join(", ")));
  }
  row
}

pub fn analysis_summary(report: &AnalysisReport) -> String {
  let percent = (report.confidence * 100.0).round() as i64;
  format!("face shape: {} ({percent}% confidence)", report.face_shape.bold())
}

/// Print a failure the way the advice table describes it.
pub fn present_failure(failure: &Failure) {
  let advice = failure.advice();
  sassoon::error(&format!("{}: {}", advice.title, advice.message));
  sassoon::info(advice.suggestion);
}

/// Attempt observer for long uploads.
pub fn present_attempt(event: AttemptEvent) {
  match event.status {
    AttemptStatus::Attempting if event.attempt > 1 => {
      sassoon::warn(&format!("retrying ({} of {})", event.attempt, event.total_attempts));
    }
    AttemptStatus::Attempting => {}
    AttemptStatus::Success => {}
  }
}
