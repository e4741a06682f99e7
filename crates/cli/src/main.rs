mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// studio - develop your Composer packages in place
#[derive(Parser)]
#[command(name = "studio")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project root (defaults to the current directory)
  #[arg(long, global = true)]
  project: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Replace installed copies of managed packages with links
  Link,

  /// Remove managed links and restore the original copies
  Unlink,

  /// Show managed paths and their current link state
  Status {
    /// Emit machine-readable JSON
    #[arg(long)]
    json: bool,
  },

  /// Create a new package skeleton and register it with studio
  Create {
    /// The path where the new package should be created
    path: PathBuf,

    /// Download the given Git repository instead of creating a skeleton
    #[arg(short, long)]
    git: Option<String>,

    /// Package name as vendor/name (prompted for when omitted)
    #[arg(long)]
    name: Option<String>,
  },
}

fn main() -> Result<()> {
  // Initialize logging
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();
  let root = project_root(cli.project)?;

  match cli.command {
    Commands::Link => cmd::cmd_link(&root),
    Commands::Unlink => cmd::cmd_unlink(&root),
    Commands::Status { json } => cmd::cmd_status(&root, json),
    Commands::Create { path, git, name } => cmd::cmd_create(&root, &path, git.as_deref(), name),
  }
}

fn project_root(flag: Option<PathBuf>) -> Result<PathBuf> {
  let root = match flag {
    Some(path) => path,
    None => std::env::current_dir().context("Failed to determine the current directory")?,
  };
  dunce::canonicalize(&root).with_context(|| format!("Project root {} does not exist", root.display()))
}
