//! CLI definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// Aurorae Haven - backup, restore and migrate your productivity data
#[derive(Parser, Debug)]
#[command(name = "haven", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: ~/.aurorae-haven)
    #[arg(long, global = true, env = "HAVEN_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Structured store path (default: <data-dir>/data/haven.db)
    #[arg(long, global = true, env = "HAVEN_DB")]
    pub db: Option<PathBuf>,

    /// Use only the key-string store
    #[arg(long, global = true)]
    pub no_structured: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export all data to a JSON backup
    Export {
        /// Directory to write the backup into (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the backup to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// Import a JSON backup
    Import {
        /// Backup file to import
        file: PathBuf,

        /// Skip re-reading state after the import
        #[arg(long)]
        no_reload: bool,
    },

    /// Show what is stored and where
    Status,

    /// Deep-link redirects for static hosting
    Redirect {
        #[command(subcommand)]
        command: RedirectCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Redirect Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum RedirectCommands {
    /// Capture an unresolved request and store it for the next start
    Capture {
        /// Requested path, e.g. /aurorae-haven/tasks
        pathname: String,

        /// Query string including '?'
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        search: String,

        /// Fragment including '#'
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        hash: String,

        /// Origin, e.g. https://example.github.io
        #[arg(long)]
        origin: String,
    },

    /// Consume the stored redirect and print the in-app route
    Resolve {
        /// Base path to strip (default: basePath from config.json)
        #[arg(long)]
        base_path: Option<String>,
    },
}
