use crate::guarded::{DirOps, SystemOps};
use std::cell::RefCell;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// One primitive of the create/lock/close protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Create,
    Open,
    Lock,
    Close,
    Remove,
}

/// [`SystemOps`] with injectable failures and a record of every call made.
///
/// Injected close failures still close the descriptor, so failing tests
/// never leak one.
#[derive(Debug, Default)]
pub(crate) struct FaultyOps {
    inner: SystemOps,
    failing: Vec<Step>,
    fixed_path: Option<PathBuf>,
    calls: RefCell<Vec<Step>>,
}

impl FaultyOps {
    pub(crate) fn failing(steps: &[Step]) -> Self {
        Self {
            failing: steps.to_vec(),
            ..Self::default()
        }
    }

    /// Make `create_dir` hand out `path` instead of creating a new directory.
    pub(crate) fn with_fixed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixed_path = Some(path.into());
        self
    }

    pub(crate) fn with_inner(mut self, inner: SystemOps) -> Self {
        self.inner = inner;
        self
    }

    pub(crate) fn calls(&self) -> Vec<Step> {
        self.calls.borrow().clone()
    }

    fn enter(&self, step: Step) -> bool {
        self.calls.borrow_mut().push(step);
        self.failing.contains(&step)
    }
}

impl DirOps for FaultyOps {
    fn create_dir(&self, parent: &Path, prefix: &str) -> io::Result<PathBuf> {
        if self.enter(Step::Create) {
            return Err(io::Error::from_raw_os_error(libc::EACCES));
        }
        match &self.fixed_path {
            Some(path) => Ok(path.clone()),
            None => self.inner.create_dir(parent, prefix),
        }
    }

    fn open_dir(&self, path: &Path) -> io::Result<File> {
        if self.enter(Step::Open) {
            return Err(io::Error::from_raw_os_error(libc::EMFILE));
        }
        self.inner.open_dir(path)
    }

    fn lock_shared(&self, handle: &File) -> io::Result<()> {
        if self.enter(Step::Lock) {
            return Err(io::Error::from_raw_os_error(libc::ENOLCK));
        }
        self.inner.lock_shared(handle)
    }

    fn close(&self, handle: File) -> io::Result<()> {
        if self.enter(Step::Close) {
            drop(handle);
            return Err(io::Error::from_raw_os_error(libc::EIO));
        }
        self.inner.close(handle)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        if self.enter(Step::Remove) {
            return Err(io::Error::from_raw_os_error(libc::EBUSY));
        }
        self.inner.remove_dir(path)
    }
}

/// Number of descriptors held by this process that refer to `dir` or
/// anything below it, including entries that have since been deleted.
pub(crate) fn fds_under(dir: &Path) -> usize {
    let dir = fs::canonicalize(dir).unwrap();
    fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| fs::read_link(entry.path()).ok())
        .filter(|target| target.starts_with(&dir))
        .count()
}

/// Names of the entries directly inside `dir`, sorted.
pub(crate) fn entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
