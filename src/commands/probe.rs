//! `guardtmp probe`: report the lock state of a directory.

use crate::cli::ProbeArgs;
use crate::error::{Error, Result};
use crate::exit_codes;
use crate::probe::{LockState, probe};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ProbeReport<'a> {
    path: &'a Path,
    state: LockState,
}

pub fn cmd_probe(args: ProbeArgs) -> Result<i32> {
    let state = probe(&args.path)?;

    if args.json {
        let report = ProbeReport {
            path: &args.path,
            state,
        };
        let json = serde_json::to_string(&report).map_err(|e| {
            Error::UserError(format!("failed to serialize probe report to JSON: {}", e))
        })?;
        println!("{}", json);
    } else {
        println!("{}", state);
    }

    Ok(exit_code_for(state))
}

fn exit_code_for(state: LockState) -> i32 {
    if state.is_in_use() {
        exit_codes::IN_USE
    } else {
        exit_codes::SUCCESS
    }
}
