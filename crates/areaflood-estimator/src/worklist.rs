//! Pending units of work for one estimator run.
//!
//! Visits are kept on a LIFO stack. Pushing a cell's neighbors in reverse
//! and checking the counted flag only when a visit is popped reproduces the
//! order of a depth-first recursion over left, up, right, down. Once the
//! stack is empty the corner pass is handed out exactly once.

/// A single unit of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Task {
    Visit(usize),
    Corners,
}

#[derive(Debug, Default)]
pub(crate) struct Worklist {
    stack: Vec<usize>,
    corners_pending: bool,
}

impl Worklist {
    /// Drop anything left over and schedule `first` in the order given.
    pub(crate) fn seed(&mut self, first: &[usize]) {
        self.stack.clear();
        self.push_all(first);
        self.corners_pending = true;
    }

    /// Schedule `indices` so that `indices[0]` is visited next.
    pub(crate) fn push_all(&mut self, indices: &[usize]) {
        self.stack.extend(indices.iter().rev());
    }

    pub(crate) fn pop(&mut self) -> Option<Task> {
        if let Some(i) = self.stack.pop() {
            return Some(Task::Visit(i));
        }
        if std::mem::take(&mut self.corners_pending) {
            return Some(Task::Corners);
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        self.stack.clear();
        self.corners_pending = false;
    }

    /// Number of visits still queued.
    pub(crate) fn len(&self) -> usize {
        self.stack.len()
    }
}
