//! guardtmp: run commands in temporary directories that reapers leave alone.
//!
//! This is the main entry point for the `guardtmp` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

use guardtmp::cli::Cli;
use guardtmp::{commands, logging};
use std::error::Error as _;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli) {
        Ok(code) => ExitCode::from(code as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }

            // Return appropriate exit code
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
