//! The guarded temporary directory value and its create/close protocol.

use super::ops::{DirOps, SystemOps, close_handle};
use super::undo::{Undo, UndoStack};
use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A freshly created temporary directory held under a shared advisory lock.
///
/// The lock lives as long as the value: `close` (or dropping the value)
/// closes the directory descriptor and the kernel releases the lock with it.
/// The directory itself is never removed by this type.
#[derive(Debug)]
pub struct GuardedTempDir {
    path: PathBuf,
    /// `Some` from a successful create until close or drop.
    handle: Option<File>,
}

impl GuardedTempDir {
    /// Create a temporary directory under `parent` whose name starts with
    /// `prefix`, and take a shared lock on it.
    ///
    /// An empty `parent` means the system temporary directory (`$TMPDIR`
    /// or `/tmp`). The lock step blocks while an exclusive lock is held on
    /// the new directory; use [`GuardedTempDir::create_with`] with
    /// [`SystemOps::fail_fast`] to fail instead.
    ///
    /// # Errors
    ///
    /// * `Error::CreationFailed` - the directory could not be created
    /// * `Error::OpenFailed` - the directory could not be opened (it is removed again)
    /// * `Error::LockFailed` - the lock could not be taken (the handle is
    ///   closed and the directory removed again)
    pub fn create(parent: impl AsRef<Path>, prefix: &str) -> Result<Self> {
        Self::create_with(&SystemOps::default(), parent, prefix)
    }

    /// Same as [`GuardedTempDir::create`], running each step through `ops`.
    pub fn create_with<O: DirOps + ?Sized>(
        ops: &O,
        parent: impl AsRef<Path>,
        prefix: &str,
    ) -> Result<Self> {
        let parent = parent.as_ref();

        let path = ops
            .create_dir(parent, prefix)
            .map_err(|source| Error::CreationFailed {
                parent: parent.to_path_buf(),
                prefix: prefix.to_string(),
                source,
            })?;

        let mut undo = UndoStack::new(ops);
        undo.push(Undo::RemoveDir(path.clone()));

        let handle = match ops.open_dir(&path) {
            Ok(handle) => handle,
            Err(source) => {
                undo.unwind();
                return Err(Error::OpenFailed { path, source });
            }
        };

        if let Err(source) = ops.lock_shared(&handle) {
            undo.push(Undo::CloseHandle(handle));
            undo.unwind();
            return Err(Error::LockFailed { path, source });
        }

        undo.commit();
        debug!(path = %path.display(), "created guarded temporary directory");

        Ok(Self {
            path,
            handle: Some(handle),
        })
    }

    /// Absolute path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock by closing the directory descriptor.
    ///
    /// After this call a reaper may delete the directory at any time. The
    /// directory and its contents are left untouched; remove them first if
    /// they should not outlive the lock. The descriptor is released even
    /// when `Error::CloseFailed` is returned.
    pub fn close(mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        close_handle(handle).map_err(|source| Error::CloseFailed {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "released guarded temporary directory");
        Ok(())
    }
}

impl AsRef<Path> for GuardedTempDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for GuardedTempDir {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            drop(handle);
            debug!(
                path = %self.path.display(),
                "guarded temporary directory dropped without close; lock released"
            );
        }
    }
}
