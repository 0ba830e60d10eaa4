//! Command-line argument parsing for EduBot
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EduBot - retrieval-augmented tutor for exam preparation
#[derive(Parser, Debug)]
#[command(name = "edubot")]
#[command(version)]
#[command(about = "Answer student questions from local study material and the web", long_about = None)]
pub struct Args {
    /// Configuration file path (default: ~/.edubot/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Study material folder, overrides the config file
    #[arg(long, global = true)]
    pub rag_folder: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Index the study material and start the HTTP server
    Serve {
        /// Address to bind, overrides the config file
        #[arg(long)]
        bind: Option<String>,
    },

    /// Build the index once and print what was indexed
    Index,

    /// Answer a single question and print the response as JSON
    Ask {
        /// The student's question
        #[arg(value_name = "QUESTION")]
        question: String,

        /// Skip retrieval from study material
        #[arg(long)]
        no_rag: bool,

        /// Always consult the web
        #[arg(long)]
        web: bool,

        /// Image to send with the question (file path, data URL or base64)
        #[arg(long)]
        image: Option<String>,
    },

    /// Display the effective configuration (API keys redacted)
    Config,
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

    /// The subcommand to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Serve { bind: None })
    }
}

impl Verbosity {
    /// Default `tracing` filter directive when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::VeryVerbose => "trace",
        }
    }
}
