//! Command-line argument parsing for tutorbuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tutor::Mode;

/// tutorbuddy - practice English vocabulary, grammar and conversation
#[derive(Parser, Debug)]
#[command(name = "tutorbuddy")]
#[command(version)]
#[command(about = "Interactive terminal English tutor", long_about = None)]
pub struct Args {
    /// Chat model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Progress file path (overrides config)
    #[arg(long)]
    pub progress_file: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only errors are logged)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start interactive practice (default)
    Start {
        /// Practice mode to open with
        #[arg(long, value_parser = parse_mode, default_value = "vocabulary")]
        mode: Mode,
    },

    /// Define a word and use it in a sentence
    Vocab {
        /// Word to learn
        word: String,
    },

    /// Correct the grammar of a sentence
    Grammar {
        /// Sentence to check
        #[arg(required = true, num_args = 1..)]
        sentence: Vec<String>,
    },

    /// Show saved progress
    Progress {
        /// Only show one module (Vocabulary or Grammar)
        #[arg(long)]
        module: Option<String>,
    },

    /// Display current configuration
    Config,

    /// Check configuration, credential and progress file
    Doctor,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Command to run; no subcommand starts the REPL in vocabulary mode
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start {
            mode: Mode::Vocabulary,
        })
    }
}

fn parse_mode(value: &str) -> Result<Mode, String> {
    Mode::parse(value).ok_or_else(|| {
        format!(
            "unknown mode '{}' (expected vocabulary, grammar or conversation)",
            value
        )
    })
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter directive for this verbosity
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "tutorbuddy=debug",
            Verbosity::VeryVerbose => "trace",
        }
    }

    /// Check if should show the waiting spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
