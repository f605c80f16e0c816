//! Shared observer recorder for backend and operator tests.

use kelp_core::{Collection, CollectionObserver};
use std::cell::RefCell;
use std::rc::Rc;

/// Records every notification batch it receives.
pub(crate) struct RecordingObserver<T: Clone + PartialEq + 'static> {
    added: RefCell<Vec<Vec<T>>>,
    removed: RefCell<Vec<Vec<T>>>,
}

impl<T: Clone + PartialEq + 'static> RecordingObserver<T> {
    pub(crate) fn new() -> Self {
        Self {
            added: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
        }
    }

    /// Added batches in arrival order.
    pub(crate) fn added_batches(&self) -> Vec<Vec<T>> {
        self.added.borrow().clone()
    }

    /// Removed batches in arrival order.
    pub(crate) fn removed_batches(&self) -> Vec<Vec<T>> {
        self.removed.borrow().clone()
    }

    /// All added items, batches flattened.
    pub(crate) fn added_flat(&self) -> Vec<T> {
        self.added.borrow().iter().flatten().cloned().collect()
    }

    /// All removed items, batches flattened.
    pub(crate) fn removed_flat(&self) -> Vec<T> {
        self.removed.borrow().iter().flatten().cloned().collect()
    }
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for RecordingObserver<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        self.added.borrow_mut().push(items.to_vec());
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        self.removed.borrow_mut().push(items.to_vec());
    }
}

/// A fresh recorder, ready to pass to `register_observer`.
pub(crate) fn recording<T: Clone + PartialEq + 'static>() -> Rc<RecordingObserver<T>> {
    Rc::new(RecordingObserver::new())
}
