//! `guardtmp run`: run a command inside a guarded temporary directory.
//!
//! The lock is held by this process (the descriptor is close-on-exec, so
//! the child never sees it) and released once the child has exited. The
//! directory is left behind for the caller or the reaper.

use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::exit_codes;
use crate::guarded::{GuardedTempDir, LockWait};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{info, warn};

/// Summary printed with `--json` once the child has exited.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    path: &'a Path,
    exit_code: i32,
    closed: bool,
}

pub fn cmd_run(args: RunArgs, config_path: Option<&Path>) -> Result<i32> {
    let config = effective_config(&args, config_path)?;

    let Some((program, program_args)) = args.command.split_first() else {
        return Err(Error::UserError("no command given to run".to_string()));
    };

    let guard = GuardedTempDir::create_with(&config.ops(), config.parent(), &config.prefix)?;
    info!(path = %guard.path().display(), program = %program, "running command in guarded directory");

    let mut command = Command::new(program);
    command.args(program_args).env(&config.env_var, guard.path());
    if args.cd {
        command.current_dir(guard.path());
    }

    // The child has to be finished with the directory before the lock goes.
    let status = command.status();
    let path = guard.path().to_path_buf();
    let closed = guard.close();

    let status = status.map_err(|source| Error::CommandFailed {
        program: program.clone(),
        source,
    })?;
    let exit_code = exit_code_of(status);

    if let Err(e) = &closed {
        warn!(path = %path.display(), error = %e, "failed to release guarded directory");
    }

    if args.json {
        print_summary(&path, exit_code, closed.is_ok())?;
    }

    closed?;
    Ok(exit_code)
}

/// Config file values with command-line overrides applied.
fn effective_config(args: &RunArgs, config_path: Option<&Path>) -> Result<Config> {
    let mut config = Config::resolve(config_path)?;

    if let Some(parent) = &args.parent {
        config.parent_dir = Some(parent.clone());
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if args.fail_fast {
        config.lock_wait = LockWait::FailFast;
    }
    if let Some(env) = &args.env {
        config.env_var = env.clone();
    }

    config.validate()?;
    Ok(config)
}

/// The child's exit code, or 128 + signal number if it was killed.
fn exit_code_of(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => exit_codes::SIGNAL_BASE + signal,
        (None, None) => exit_codes::COMMAND_FAILURE,
    }
}

fn print_summary(path: &Path, exit_code: i32, closed: bool) -> Result<()> {
    let summary = RunSummary {
        path,
        exit_code,
        closed,
    };
    let json = serde_json::to_string(&summary)
        .map_err(|e| Error::UserError(format!("failed to serialize run summary to JSON: {}", e)))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{LockState, probe};
    use crate::test_support::entries;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn run_args(parent: &Path, command: &[&str]) -> RunArgs {
        RunArgs {
            parent: Some(parent.to_path_buf()),
            prefix: Some("job-".to_string()),
            fail_fast: false,
            cd: false,
            env: None,
            json: false,
            command: command.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn only_entry(parent: &Path) -> PathBuf {
        let names = entries(parent);
        assert_eq!(names.len(), 1, "expected exactly one directory, got {names:?}");
        parent.join(&names[0])
    }

    #[test]
    #[serial]
    fn test_run_exports_directory_and_keeps_it() {
        let parent = TempDir::new().unwrap();
        let args = run_args(
            parent.path(),
            &["sh", "-c", r#"test -d "$GUARDTMP_DIR" && echo hi > "$GUARDTMP_DIR/out""#],
        );

        let code = cmd_run(args, None).unwrap();

        assert_eq!(code, 0);
        let dir = only_entry(parent.path());
        assert!(dir.file_name().unwrap().to_string_lossy().starts_with("job-"));
        assert_eq!(fs::read_to_string(dir.join("out")).unwrap(), "hi\n");
        assert_eq!(probe(&dir).unwrap(), LockState::Free);
    }

    #[test]
    #[serial]
    fn test_run_propagates_exit_code() {
        let parent = TempDir::new().unwrap();
        let code = cmd_run(run_args(parent.path(), &["sh", "-c", "exit 7"]), None).unwrap();
        assert_eq!(code, 7);
    }

    #[test]
    #[serial]
    fn test_run_reports_signal_exit() {
        let parent = TempDir::new().unwrap();
        let code = cmd_run(
            run_args(parent.path(), &["sh", "-c", "kill -TERM $$"]),
            None,
        )
        .unwrap();
        assert_eq!(code, exit_codes::SIGNAL_BASE + libc::SIGTERM);
    }

    #[test]
    #[serial]
    fn test_run_cd_and_custom_env() {
        let parent = TempDir::new().unwrap();
        let mut args = run_args(
            parent.path(),
            &["sh", "-c", r#"touch here && test -e "$JOB_DIR/here""#],
        );
        args.cd = true;
        args.env = Some("JOB_DIR".to_string());

        let code = cmd_run(args, None).unwrap();

        assert_eq!(code, 0);
        assert!(only_entry(parent.path()).join("here").exists());
    }

    #[test]
    #[serial]
    fn test_run_spawn_failure_releases_directory() {
        let parent = TempDir::new().unwrap();
        let args = run_args(parent.path(), &["/nonexistent/guardtmp-test-binary"]);

        let err = cmd_run(args, None).unwrap_err();

        assert!(matches!(err, Error::CommandFailed { .. }));
        assert_eq!(err.exit_code(), exit_codes::COMMAND_FAILURE);
        let dir = only_entry(parent.path());
        assert_eq!(probe(&dir).unwrap(), LockState::Free);
    }

    #[test]
    #[serial]
    fn test_run_rejects_invalid_prefix_before_creating() {
        let parent = TempDir::new().unwrap();
        let mut args = run_args(parent.path(), &["true"]);
        args.prefix = Some("a/b".to_string());

        let err = cmd_run(args, None).unwrap_err();

        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(entries(parent.path()).is_empty());
    }

    #[test]
    #[serial]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("guardtmp.yaml");
        fs::write(&config_path, "prefix: file-\nenv_var: FROM_FILE\n").unwrap();

        let mut args = run_args(dir.path(), &["true"]);
        args.prefix = None;
        args.fail_fast = true;
        let config = effective_config(&args, Some(&config_path)).unwrap();

        assert_eq!(config.prefix, "file-");
        assert_eq!(config.env_var, "FROM_FILE");
        assert_eq!(config.lock_wait, LockWait::FailFast);
        assert_eq!(config.parent(), dir.path());
    }

    #[test]
    fn test_run_summary_json_shape() {
        let summary = RunSummary {
            path: Path::new("/tmp/job-1"),
            exit_code: 3,
            closed: true,
        };
        assert_eq!(
            serde_json::to_string(&summary).unwrap(),
            r#"{"path":"/tmp/job-1","exit_code":3,"closed":true}"#
        );
    }
}
