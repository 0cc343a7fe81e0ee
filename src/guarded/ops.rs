//! Filesystem and locking primitives used by [`GuardedTempDir`](super::GuardedTempDir).
//!
//! The create protocol only talks to the outside world through [`DirOps`],
//! so each step can be replaced (and made to fail) independently.

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::fd::IntoRawFd;
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// What the shared-lock step does when the lock is contended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockWait {
    /// Wait until the lock can be taken (plain `flock(LOCK_SH)`).
    #[default]
    Block,
    /// Fail with `ErrorKind::WouldBlock` instead of waiting (`LOCK_SH | LOCK_NB`).
    FailFast,
}

impl std::fmt::Display for LockWait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockWait::Block => write!(f, "block"),
            LockWait::FailFast => write!(f, "fail_fast"),
        }
    }
}

/// The primitives the create/lock/close protocol is built from.
pub trait DirOps {
    /// Create a new, empty, uniquely named directory under `parent` whose
    /// name starts with `prefix`, and return its path. A `prefix` that would
    /// place the directory anywhere else is an `InvalidInput` error.
    fn create_dir(&self, parent: &Path, prefix: &str) -> io::Result<PathBuf>;

    /// Open `path` for directory traversal only.
    fn open_dir(&self, path: &Path) -> io::Result<File>;

    /// Take a shared advisory lock on `handle`.
    fn lock_shared(&self, handle: &File) -> io::Result<()>;

    /// Close `handle`, releasing any advisory lock held through it.
    fn close(&self, handle: File) -> io::Result<()>;

    /// Remove the (empty) directory at `path`.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

/// [`DirOps`] backed by the real kernel primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemOps {
    pub wait: LockWait,
}

impl SystemOps {
    pub fn new(wait: LockWait) -> Self {
        Self { wait }
    }

    /// Operations whose lock step never blocks.
    pub fn fail_fast() -> Self {
        Self::new(LockWait::FailFast)
    }
}

impl DirOps for SystemOps {
    fn create_dir(&self, parent: &Path, prefix: &str) -> io::Result<PathBuf> {
        // The new directory must land directly under `parent`.
        if prefix.contains('/') || prefix.contains('\0') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("prefix '{}' contains a path separator or NUL", prefix.escape_default()),
            ));
        }

        let parent = if parent.as_os_str().is_empty() {
            env::temp_dir()
        } else {
            std::path::absolute(parent)?
        };

        // Without explicit permissions tempfile only applies the umask.
        // keep() stops the directory from being deleted when the builder's
        // handle goes away.
        let dir = tempfile::Builder::new()
            .prefix(prefix)
            .permissions(fs::Permissions::from_mode(0o700))
            .tempdir_in(&parent)?;
        Ok(dir.keep())
    }

    fn open_dir(&self, path: &Path) -> io::Result<File> {
        // std adds O_CLOEXEC, so children spawned while the lock is held do
        // not inherit the descriptor.
        OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_DIRECTORY)
            .open(path)
    }

    fn lock_shared(&self, handle: &File) -> io::Result<()> {
        match self.wait {
            LockWait::Block => FileExt::lock_shared(handle),
            LockWait::FailFast => FileExt::try_lock_shared(handle),
        }
    }

    fn close(&self, handle: File) -> io::Result<()> {
        close_handle(handle)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }
}

/// Close a descriptor and report the result of `close(2)`.
///
/// Dropping a `File` swallows close errors, so the descriptor is taken out
/// of the `File` and closed by hand. The descriptor is gone after this call
/// whether or not an error is returned.
pub(crate) fn close_handle(handle: File) -> io::Result<()> {
    let fd = handle.into_raw_fd();
    // SAFETY: `fd` was just released from an owned `File`; nothing else
    // refers to it and it is never used again after this call.
    if unsafe { libc::close(fd) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
