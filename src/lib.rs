//! guardtmp: temporary directories held under a shared advisory lock.
//!
//! Periodic cleaners such as `systemd-tmpfiles` delete old directories
//! under `/tmp` unless a lock shows they are still in use. A
//! [`GuardedTempDir`] creates a fresh directory and holds `flock(LOCK_SH)`
//! on it until it is closed, so the directory survives for as long as the
//! caller needs it and becomes reclaimable as soon as the lock is gone.
//!
//! ```no_run
//! use guardtmp::GuardedTempDir;
//!
//! let dir = GuardedTempDir::create("/tmp", "job-")?;
//! std::fs::write(dir.path().join("input.txt"), "data")?;
//! // ... work inside dir.path() ...
//! dir.close()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod guarded;
pub mod logging;
pub mod probe;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use guarded::{DirOps, GuardedTempDir, LockWait, SystemOps};
pub use probe::{LockState, is_in_use, probe};
