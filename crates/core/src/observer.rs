//! Collection observer contract and notification dispatch.
//!
//! Observers are registered on a collection and receive the batch of items
//! affected by each mutation. Dispatch isolates callback panics so that one
//! misbehaving observer can neither abort the mutating caller nor starve the
//! observers registered after it.

use crate::collection::Collection;
use crate::subscription::SubscriberFn;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Listens to changes in a collection.
///
/// Implemented by application code and passed to
/// [`Collection::register_observer`]. Both callbacks receive the full batch
/// of items affected by one logical mutation, plus a reference to the
/// emitting collection for convenience.
pub trait CollectionObserver<T: Clone + PartialEq + 'static> {
    /// Called after items have been added to the collection.
    fn added(&self, items: &[T], coll: &dyn Collection<T>);

    /// Called after items have been removed from the collection.
    fn removed(&self, items: &[T], coll: &dyn Collection<T>);
}

/// Invokes `added` on every observer in order, isolating panics.
///
/// The observer list must be a snapshot taken while no interior borrow of the
/// emitting collection is held: callbacks are free to mutate this or any
/// other collection re-entrantly.
pub fn dispatch_added<T: Clone + PartialEq + 'static>(
    observers: &[Rc<dyn CollectionObserver<T>>],
    items: &[T],
    coll: &dyn Collection<T>,
) {
    if items.is_empty() {
        return;
    }
    for observer in observers {
        let result = catch_unwind(AssertUnwindSafe(|| observer.added(items, coll)));
        if let Err(payload) = result {
            log::error!("collection observer panicked in added(): {}", panic_message(payload.as_ref()));
        }
    }
}

/// Invokes `removed` on every observer in order, isolating panics.
pub fn dispatch_removed<T: Clone + PartialEq + 'static>(
    observers: &[Rc<dyn CollectionObserver<T>>],
    items: &[T],
    coll: &dyn Collection<T>,
) {
    if items.is_empty() {
        return;
    }
    for observer in observers {
        let result = catch_unwind(AssertUnwindSafe(|| observer.removed(items, coll)));
        if let Err(payload) = result {
            log::error!("collection observer panicked in removed(): {}", panic_message(payload.as_ref()));
        }
    }
}

/// Invokes a store-style subscriber with a contents snapshot, isolating panics.
pub fn dispatch_snapshot<T: Clone + PartialEq + 'static>(
    subscriber: &SubscriberFn<T>,
    contents: &[T],
) {
    let callback: &dyn Fn(&[T]) = subscriber.as_ref();
    let result = catch_unwind(AssertUnwindSafe(|| callback(contents)));
    if let Err(payload) = result {
        log::error!("collection subscriber panicked: {}", panic_message(payload.as_ref()));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("opaque panic payload")
}
