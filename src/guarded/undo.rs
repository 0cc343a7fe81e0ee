//! Undo stack for a create that fails part-way.

use super::ops::DirOps;
use std::fs::File;
use std::path::PathBuf;
use tracing::warn;

/// A release action for a resource acquired by an earlier step.
#[derive(Debug)]
pub(crate) enum Undo {
    CloseHandle(File),
    RemoveDir(PathBuf),
}

/// Release actions, unwound newest first.
///
/// A failing undo step is logged and skipped; the remaining steps still run.
/// If the stack is dropped without `commit`, it unwinds.
pub(crate) struct UndoStack<'a, O: DirOps + ?Sized> {
    ops: &'a O,
    steps: Vec<Undo>,
}

impl<'a, O: DirOps + ?Sized> UndoStack<'a, O> {
    pub(crate) fn new(ops: &'a O) -> Self {
        Self {
            ops,
            steps: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, step: Undo) {
        self.steps.push(step);
    }

    /// Run every pending release action in reverse order.
    pub(crate) fn unwind(mut self) {
        self.run();
    }

    /// Keep every acquired resource; nothing is released.
    pub(crate) fn commit(mut self) {
        self.steps.clear();
    }

    fn run(&mut self) {
        while let Some(step) = self.steps.pop() {
            match step {
                Undo::CloseHandle(handle) => {
                    if let Err(e) = self.ops.close(handle) {
                        warn!(error = %e, "rollback: failed to close directory handle");
                    }
                }
                Undo::RemoveDir(path) => {
                    if let Err(e) = self.ops.remove_dir(&path) {
                        warn!(
                            path = %path.display(),
                            error = %e,
                            "rollback: failed to remove temporary directory"
                        );
                    }
                }
            }
        }
    }
}

impl<O: DirOps + ?Sized> Drop for UndoStack<'_, O> {
    fn drop(&mut self) {
        self.run();
    }
}
