//! CLI argument parsing for guardtmp.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// guardtmp: temporary directories that tmpfiles reapers leave alone.
///
/// A guarded directory is held under a shared advisory lock (flock) for as
/// long as it is in use. Cleaners that take an exclusive lock before
/// deleting skip it until the lock is released.
#[derive(Parser, Debug)]
#[command(name = "guardtmp")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to read (default: $GUARDTMP_CONFIG, if set).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for guardtmp.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command inside a freshly created, locked temporary directory.
    ///
    /// The directory path is exported to the command through an environment
    /// variable. The lock is released when the command exits; the directory
    /// itself is left in place.
    Run(RunArgs),

    /// Report whether a directory is currently locked.
    ///
    /// Prints free, shared or exclusive. Exits 0 when free and 5 when locked.
    Probe(ProbeArgs),

    /// Print the effective configuration as YAML.
    Config,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Directory to create the temporary directory under.
    #[arg(short, long, value_name = "DIR")]
    pub parent: Option<PathBuf>,

    /// Name prefix of the temporary directory.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Fail instead of waiting if the lock cannot be taken immediately.
    #[arg(long)]
    pub fail_fast: bool,

    /// Run the command with the temporary directory as its working directory.
    #[arg(long)]
    pub cd: bool,

    /// Environment variable that receives the directory path.
    #[arg(long, value_name = "NAME")]
    pub env: Option<String>,

    /// Print a JSON summary on stdout after the command exits.
    #[arg(long)]
    pub json: bool,

    /// The command to run, followed by its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Arguments for the `probe` command.
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Directory to inspect.
    pub path: PathBuf,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
