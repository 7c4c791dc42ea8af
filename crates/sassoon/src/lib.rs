//! Leveled, colored log output for the StrandHub command-line tools.
//!
//! Everything goes to stderr so command output stays pipeable. Levels carry a
//! short bracketed prefix; `headline` and `as_banner` exist for the few places
//! a command wants to set a scene before doing work.

use colored::*;

/// Log levels understood by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Verbose,
  Info,
  Warn,
  Error,
  Success,
}

impl Level {
  fn tag(self) -> &'static str {
    match self {
      Level::Verbose => "verb",
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Success => "done",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Verbose => Color::Cyan,
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Success => Color::Green,
    }
  }
}

/// Emit a message at the given level, one prefixed line per input line.
pub fn emit(level: Level, message: &str) {
  let tag = level.tag();
  let prefix = format!("[{}]{:width$}", tag.color(level.color()).bold(), "", width = 6 - tag.len());
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
  if message.is_empty() {
    eprintln!("{prefix}");
  }
}

pub fn verbose(message: &str) {
  emit(Level::Verbose, message);
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

pub fn success(message: &str) {
  emit(Level::Success, message);
}

/// A repeated-character rule of the given width.
pub fn rule(width: usize, ch: char) -> String {
  ch.to_string().repeat(width)
}

/// Print a message framed by rules above and below.
pub fn as_banner(message: &str, width: Option<usize>, border: Option<char>) {
  let width = width.unwrap_or(60);
  let border = border.unwrap_or('=');
  let line = rule(width, border);

  eprintln!("{line}");
  for part in message.lines() {
    eprintln!("{part}");
  }
  eprintln!("{line}");
}

/// A bold one-line headline for the start of a command.
pub fn headline(message: &str) {
  eprintln!("{}", message.bold());
}
