//! Command-line interface for technotes.
//!
//! This module provides the CLI structure and the terminal printers for the
//! `technotes` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, IconsCommand, ListCommand, ModeArg, OutputFormat, PostCommand, ServeCommand,
    ShowCommand,
};

/// technotes - Bite-sized tech notes
///
/// Serves a small blog of short technology notes with an activity heatmap,
/// and edits the notes from the terminal in development mode.
#[derive(Debug, Parser)]
#[command(name = "technotes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the web server
    Serve(ServeCommand),

    /// List posts, newest first
    List(ListCommand),

    /// Show one post
    Show(ShowCommand),

    /// Show the 12-week activity heatmap
    Activity,

    /// List or search the technology icons
    Icons(IconsCommand),

    /// Create, edit or delete posts (development mode only)
    #[command(subcommand)]
    Post(PostCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
