//! Exit code constants for the guardtmp CLI.
//!
//! - 0: Success (or the child's own exit code for `run`)
//! - 1: User error (bad args, invalid config)
//! - 2: Setup failure (directory create/open/close, probe I/O)
//! - 3: Child command could not be spawned or waited on
//! - 4: Shared lock could not be acquired
//! - 5: `probe` found the path locked

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Setup failure: the temporary directory could not be created, opened, or closed.
pub const SETUP_FAILURE: i32 = 2;

/// The child command could not be started or waited on.
pub const COMMAND_FAILURE: i32 = 3;

/// Lock acquisition failure: the shared lock could not be taken.
pub const LOCK_FAILURE: i32 = 4;

/// `probe` found the path held by at least one lock.
pub const IN_USE: i32 = 5;

/// Offset added to a signal number when the child was killed by a signal.
pub const SIGNAL_BASE: i32 = 128;
