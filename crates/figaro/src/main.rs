use anyhow::Result;
use clap::{Parser, Subcommand};

use figaro::commands;

#[derive(Parser)]
#[command(name = "figaro")]
#[command(about = "Browse the StrandHub hairstyle catalog from the terminal")]
struct Cli {
  /// API token for likes, comments and profile (or use FIGARO_TOKEN env var)
  #[arg(long, env = "FIGARO_TOKEN")]
  token: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// List catalog styles, optionally filtered
  Browse {
    /// Substring to match against names and tags
    #[arg(short, long)]
    search: Option<String>,
    /// Category: all, trending, new, or an attribute like "oval" or "short"
    #[arg(short, long)]
    category: Option<String>,
  },
  /// Show one style with its related styles
  Show {
    /// Style id
    id: String,
  },
  /// Toggle your like on a style
  Like {
    /// Style id
    id: String,
  },
  /// List the comments on a style
  Comments {
    /// Style id
    id: String,
  },
  /// Comment on a style
  Comment {
    /// Style id
    id: String,
    /// Comment text (at least 5 characters)
    text: String,
  },
  /// Replace the text of one of your comments
  EditComment {
    /// Comment id
    id: String,
    /// New comment text
    text: String,
  },
  /// Delete one of your comments
  DeleteComment {
    /// Comment id
    id: String,
  },
  /// Analyze a photo and recommend styles for the detected face shape
  Analyze {
    /// Path to a JPEG or PNG photo
    photo: std::path::PathBuf,
  },
  /// Show your liked styles and your comments
  Profile,
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Browse { search, category } => commands::browse::handle(search, category).await,
    Commands::Show { id } => commands::show::handle(id).await,
    Commands::Like { id } => commands::like::handle(id, cli.token).await,
    Commands::Comments { id } => commands::comments::handle(id).await,
    Commands::Comment { id, text } => commands::comment::handle(id, text, cli.token).await,
    Commands::EditComment { id, text } => {
      commands::edit_comment::handle(id, text, cli.token).await
    }
    Commands::DeleteComment { id } => commands::delete_comment::handle(id, cli.token).await,
    Commands::Analyze { photo } => commands::analyze::handle(photo).await,
    Commands::Profile => commands::profile::handle(cli.token).await,
  }
}
