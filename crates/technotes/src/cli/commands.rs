//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::RunMode;
use crate::icons;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides config)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Runtime mode (overrides config)
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Page number, starting at 1
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Post id
    pub id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Icons command arguments.
#[derive(Debug, Args)]
pub struct IconsCommand {
    /// Filter by key or label (case-insensitive)
    pub query: Option<String>,
}

/// Post authoring commands. Development mode only.
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Create a post
    New {
        /// Post content (max 200 characters)
        content: String,

        /// Technology icon key
        #[arg(short, long, default_value = icons::DEFAULT_KEY)]
        icon: String,
    },

    /// Edit a post's content or icon
    Edit {
        /// Post id
        id: String,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// New technology icon key
        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: String,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Runtime mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Authoring enabled
    #[value(alias = "dev")]
    Development,
    /// Read-only public serving
    #[value(alias = "prod")]
    Production,
    /// Read-only, for automated tests
    Test,
}

impl From<ModeArg> for RunMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Development => Self::Development,
            ModeArg::Production => Self::Production,
            ModeArg::Test => Self::Test,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
