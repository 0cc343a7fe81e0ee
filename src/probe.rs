//! Non-blocking lock-state probe.
//!
//! This is the check a reaper makes before deleting a directory: open it
//! with a descriptor of our own and see which lock modes are still
//! available. The probe never leaves a lock behind.

use crate::error::{Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Advisory lock state of a directory as seen by an outside observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// No lock is held; a reaper may take the directory.
    Free,
    /// At least one shared lock is held (the directory is in use).
    Shared,
    /// An exclusive lock is held.
    Exclusive,
}

impl LockState {
    pub fn is_in_use(self) -> bool {
        self != LockState::Free
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockState::Free => write!(f, "free"),
            LockState::Shared => write!(f, "shared"),
            LockState::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// Determine the lock state of the directory at `path` without blocking.
pub fn probe(path: &Path) -> Result<LockState> {
    let wrap = |source: io::Error| Error::ProbeFailed {
        path: path.to_path_buf(),
        source,
    };

    let handle = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_DIRECTORY)
        .open(path)
        .map_err(wrap)?;

    if try_lock(FileExt::try_lock_exclusive(&handle)).map_err(wrap)? {
        release(&handle).map_err(wrap)?;
        return Ok(LockState::Free);
    }

    if try_lock(FileExt::try_lock_shared(&handle)).map_err(wrap)? {
        release(&handle).map_err(wrap)?;
        return Ok(LockState::Shared);
    }

    Ok(LockState::Exclusive)
}

/// Whether any lock is currently held on the directory at `path`.
pub fn is_in_use(path: &Path) -> Result<bool> {
    probe(path).map(LockState::is_in_use)
}

/// `Ok(true)` if the lock was taken, `Ok(false)` if it is held elsewhere.
fn try_lock(result: io::Result<()>) -> io::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
        Err(e) => Err(e),
    }
}

fn release(handle: &File) -> io::Result<()> {
    FileExt::unlock(handle)
}
