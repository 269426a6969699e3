//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::infrastructure::config::DEFAULT_CONFIG_PATH;
use crate::infrastructure::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "inkystock")]
#[command(about = "inkystock - ticker display configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to the INI configuration file
    #[arg(short, long, global = true, env = "INKYSTOCK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Environment variables the file may reference as %(NAME)s (repeatable or comma-separated)
    #[arg(short = 'e', long = "env", global = true, value_delimiter = ',')]
    pub env_allowlist: Vec<String>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Also write JSON logs to daily files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Resolve the configuration and report the first violation, if any
    Check,

    /// Resolve the configuration and print every section
    Show,
}
