//! Filekin CLI - explore related files and derive new ones.
//!
//! Reads file type definitions from `filekin.json` in the workspace root
//! (or `--config`), walks the workspace and answers link queries.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod workspace;

/// Filekin CLI - related files by configurable file types.
///
/// Run `fk` or `fk scan` to list every linked file in the current directory.
#[derive(Parser, Debug)]
#[command(
    name = "fk",
    author,
    version,
    about = "Filekin: find and create related files",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Link configuration file (defaults to <root>/filekin.json).
    #[arg(short, long, global = true, env = "FILEKIN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Walk a workspace and list every file with links (default command).
    Scan {
        /// Workspace root (defaults to current directory).
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Print machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the files linked to a path.
    Links {
        /// File to inspect.
        path: PathBuf,

        /// Workspace root (defaults to current directory).
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },

    /// List files that could be created from a path.
    Create {
        /// Source file.
        path: PathBuf,

        /// Workspace root (defaults to current directory).
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Create the missing files.
        #[arg(long)]
        apply: bool,
    },

    /// Apply transformation steps to a path and print the result.
    Transform {
        /// Path to transform. It does not need to exist.
        path: String,

        /// JSON file holding a list of transformation steps.
        #[arg(short, long)]
        steps: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Scan {
        root: PathBuf::from("."),
        json: false,
    });

    match command {
        Commands::Scan { root, json } => {
            commands::scan::execute(&root, cli.config.as_deref(), json, cli.verbose)?;
        }

        Commands::Links { path, root } => {
            commands::links::execute(&root, cli.config.as_deref(), &path)?;
        }

        Commands::Create { path, root, apply } => {
            commands::create::execute(&root, cli.config.as_deref(), &path, apply)?;
        }

        Commands::Transform { path, steps } => {
            commands::transform::execute(&path, &steps)?;
        }
    }

    Ok(())
}
