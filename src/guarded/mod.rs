//! Guarded temporary directories.
//!
//! A [`GuardedTempDir`] is a freshly created directory plus an open
//! descriptor on it that holds a **shared** `flock`. Periodic cleaners such
//! as `systemd-tmpfiles` take an exclusive lock before reaping a directory
//! and skip it when that fails, so the directory is safe from them for as
//! long as the value is alive.
//!
//! # Protocol
//!
//! Creating a guarded directory runs three steps in order, each gated on
//! the previous one:
//!
//! 1. create a uniquely named directory under the parent
//! 2. open it with `O_DIRECTORY`
//! 3. take `flock(LOCK_SH)` on the descriptor
//!
//! Every acquired resource has a release action on an undo stack. When a
//! later step fails the stack is unwound (close the descriptor, then remove
//! the directory), so a failed create leaves neither a directory nor a
//! descriptor behind. Undo failures are logged and never replace the
//! original error.
//!
//! # Release
//!
//! Closing the descriptor releases the lock; there is no separate unlock.
//! The directory is never deleted here; that is up to the caller or the
//! reaper once the lock is gone.
//!
//! The lock is shared on purpose: several processes may hold it at once.
//! It marks the directory as in use and provides no mutual exclusion
//! between its holders.

mod guard;
mod ops;
mod undo;


// Re-export public API
pub use guard::GuardedTempDir;
pub use ops::{DirOps, LockWait, SystemOps};
