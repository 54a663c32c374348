//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// In-memory book catalog: load a data file, look books up by name, find the first one
#[derive(Parser, Debug)]
#[command(name = "bookcat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Data file (default: from config, else data.txt)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up the featured books and show the first by name
    Show,

    /// Look up books by exact name
    Lookup {
        /// Book names (case-sensitive)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Show the book with the smallest name
    Min,

    /// Load the data file and report what was accepted
    Load,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init,

    /// Show config paths
    Path,
}
