//! Command implementations for guardtmp.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations. Every command returns the process exit code to use on
//! success; errors carry their own exit code.

mod probe;
mod run;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::error::Result;
use crate::exit_codes;

/// Dispatch a command to its implementation.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Run(args) => run::cmd_run(args, config_path),
        Command::Probe(args) => probe::cmd_probe(args),
        Command::Config => cmd_config(config_path),
    }
}

fn cmd_config(config_path: Option<&std::path::Path>) -> Result<i32> {
    let config = Config::resolve(config_path)?;
    if let Some(source) = Config::source(config_path) {
        println!("# source: {}", source.display());
    }
    print!("{}", config.to_yaml()?);
    Ok(exit_codes::SUCCESS)
}
