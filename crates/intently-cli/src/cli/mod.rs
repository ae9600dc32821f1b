//! CLI command definitions for the `intently` binary.
//!
//! Uses clap derive macros for argument parsing. Phrase and configuration
//! flags are global so every subcommand trains the same bank.

pub mod chat;
pub mod classify;
pub mod topics;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Resolve what a user means from what they type.
#[derive(Parser)]
#[command(name = "intently", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v logs pipeline decisions, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra phrase source: a `<topic>/<label>.txt` directory or a
    /// `.toml`/`.json` collection file. Repeatable.
    #[arg(long = "phrases", value_name = "PATH", global = true)]
    pub phrases: Vec<PathBuf>,

    /// Do not merge the built-in smalltalk phrases into the bank.
    #[arg(long, global = true)]
    pub no_builtin: bool,

    /// Data directory holding `intently.toml` and `phrases/`.
    #[arg(long, value_name = "DIR", env = "INTENTLY_DATA_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the intent of a single message.
    Classify {
        /// Message text (multiple words are joined with spaces).
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List trained topics and labels.
    #[command(alias = "ls")]
    Topics,

    /// Interactive session: every line runs through the full pipeline.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
