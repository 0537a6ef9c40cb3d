//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_CONFIG_PATH, DEFAULT_SCHEMA_PATH};

/// Configuration generator and validator for blockchain clients
#[derive(Parser)]
#[command(
    name = "chainconf",
    version,
    about = "Configuration generator and validator for blockchain clients",
    long_about = "Exports a JSON Schema for the client configuration, writes a default \
                  configuration file and validates it against the same rules."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Path to schema file
    #[arg(long, short = 's', global = true, default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: PathBuf,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Also write daily rotated log files to this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Export schema, write default configuration and validate it (default)
    Setup,
    /// Generate default configuration file
    Init,
    /// Export the configuration JSON Schema
    Schema,
    /// Validate configuration file
    Check,
    /// Display version information
    Version,
}
