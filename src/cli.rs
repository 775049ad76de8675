//! Command-line argument parsing
//!
//! Supports:
//! - Scanning text for the active trigger
//! - Tokenizing stored text against a directory
//! - Replaying a keystroke script through a composer
//! - Printing or writing the effective config

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inline @mention / #hashtag composer and tokenizer
#[derive(Parser, Debug)]
#[command(name = "tagline", version, about = "Inline @mention / #hashtag composer")]
pub struct CliArgs {
    /// Config file (defaults to ~/.config/tagline/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find the active trigger before the caret
    Scan {
        text: String,
        /// Caret offset in characters (defaults to the end of the text)
        #[arg(long, value_name = "N")]
        caret: Option<usize>,
    },
    /// Split text into text, mention and hashtag tokens
    Tokenize {
        text: String,
        /// Directory YAML (defaults to ~/.config/tagline/directory.yaml)
        #[arg(long, value_name = "FILE")]
        directory: Option<PathBuf>,
        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a keystroke script, printing the field after each step
    Replay {
        script: PathBuf,
        /// Directory YAML used as the candidate catalog
        #[arg(long, value_name = "FILE")]
        directory: Option<PathBuf>,
    },
    /// Print the effective config as YAML
    Config {
        /// Write it back to the config file, filling in defaults
        #[arg(long)]
        write: bool,
    },
}

impl Command {
    /// Directory file to load: explicit path, else the default location
    /// when it exists
    pub fn directory_path(&self) -> Option<PathBuf> {
        let explicit = match self {
            Command::Tokenize { directory, .. } | Command::Replay { directory, .. } => {
                directory.clone()
            }
            Command::Scan { .. } | Command::Config { .. } => return None,
        };
        explicit.or_else(|| crate::config_paths::directory_file().filter(|p| p.exists()))
    }
}
