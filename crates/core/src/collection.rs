//! The base collection contract shared by storage backends and operators.

use crate::error::{Error, Result};
use crate::observer::CollectionObserver;
use crate::subscription::{SubscriberFn, SubscriptionId};
use std::rc::Rc;

/// Common contract for every collection and derived collection.
///
/// Implementors are cheap-to-clone handles over shared interior state; all
/// methods take `&self` and mutations go through interior mutability so that
/// a collection can be observed and mutated through any of its handles.
///
/// Mutations follow a strict mutate-then-notify discipline: storage is fully
/// updated and all interior borrows released before observers run, so an
/// observer callback may itself mutate this or another collection.
///
/// Membership is `==` on `T`; no deep structural comparison happens beyond
/// what the item's `PartialEq` defines.
pub trait Collection<T: Clone + PartialEq + 'static> {
    /// The number of items held.
    fn length(&self) -> usize;

    /// A fresh snapshot of the contents, never a live alias.
    ///
    /// Ordered collections return items in collection order.
    fn contents(&self) -> Vec<T>;

    /// Whether an `==` item is held.
    fn contains(&self, item: &T) -> bool;

    /// Adds one item.
    fn add(&self, item: T);

    /// Removes the first `==` occurrence.
    ///
    /// Removing an item that is not present is a no-op, not an error.
    /// Returns whether anything was removed; observers are notified only in
    /// that case.
    fn remove(&self, item: &T) -> bool;

    /// Removes every `==` occurrence, returning how many were removed.
    fn remove_every(&self, item: &T) -> usize;

    /// Adds all items, notifying observers once with the whole batch.
    fn add_all(&self, items: &[T]);

    /// Removes all listed items (first occurrence each), notifying observers
    /// once with the batch of items actually removed.
    fn remove_all(&self, items: &[T]);

    /// Removes everything, notifying observers once with the old contents.
    fn clear(&self);

    /// Registers an observer. Registering the same `Rc` twice is a no-op.
    ///
    /// The collection holds the observer weakly: it does not keep the
    /// observer alive, and a dropped observer is pruned automatically.
    fn register_observer(&self, observer: Rc<dyn CollectionObserver<T>>);

    /// Undoes [`register_observer`](Collection::register_observer); no-op if
    /// the observer is not registered.
    fn unregister_observer(&self, observer: &Rc<dyn CollectionObserver<T>>);

    /// Registers a store-style subscriber.
    ///
    /// The callback is invoked immediately with the current contents
    /// (current-value replay) and again with a fresh snapshot after every
    /// change. Returns an id for [`unsubscribe`](Collection::unsubscribe).
    fn subscribe_callback(&self, callback: SubscriberFn<T>) -> SubscriptionId;

    /// Removes a subscription by id; returns whether it existed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    // Conveniences with default implementations.

    /// True if there are no items.
    fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// True if there are items.
    fn has_items(&self) -> bool {
        !self.is_empty()
    }

    /// The first item, or `None` if empty.
    fn first(&self) -> Option<T> {
        self.contents().into_iter().next()
    }

    /// The last item, or `None` if empty.
    fn last(&self) -> Option<T> {
        self.contents().into_iter().last()
    }

    /// The item at position `index` in collection order.
    ///
    /// Snapshot-based, so O(n) for non-ordered backends and operators; avoid
    /// calling it in a loop.
    fn get_index(&self, index: usize) -> Option<T> {
        self.contents().into_iter().nth(index)
    }

    /// Up to `len` items starting at position `index`.
    fn get_index_range(&self, index: usize, len: usize) -> Vec<T> {
        if len == 0 {
            return Vec::new();
        }
        self.contents().into_iter().skip(index).take(len).collect()
    }

    /// A restartable iterator over a fresh contents snapshot.
    fn iter(&self) -> std::vec::IntoIter<T> {
        self.contents().into_iter()
    }

    /// First item matching `predicate`, or `None`.
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Option<T> {
        self.contents().into_iter().find(|item| predicate(item))
    }

    /// Makes `new_contents` the contents of this collection.
    ///
    /// Observers see only the true difference: one removed batch for items
    /// no longer present, then one added batch for items not present before.
    /// Duplicate counts are not reconciled beyond presence.
    fn replace_all(&self, new_contents: &[T]) {
        let added: Vec<T> = new_contents
            .iter()
            .filter(|item| !self.contains(item))
            .cloned()
            .collect();
        let removed: Vec<T> = self
            .contents()
            .into_iter()
            .filter(|item| !new_contents.contains(item))
            .collect();
        self.remove_all(&removed);
        self.add_all(&added);
    }
}

/// A collection whose entries are addressable by key.
///
/// Implemented by the ordered backend (integer positions) and the
/// key-addressed backend (string keys).
pub trait KeyedCollection<K, T: Clone + PartialEq + 'static>: Collection<T> {
    /// Sets the value for `key`, replacing any previous value.
    ///
    /// When the new value `==` the old one the call is a no-op and observers
    /// are not notified; otherwise the old value (if any) is reported removed
    /// and the new value reported added.
    fn set(&self, key: K, item: T) -> Result<()>;

    /// The value for `key`, or `None`.
    fn get(&self, key: &K) -> Option<T>;

    /// Removes `key` and its value, reporting the removal.
    ///
    /// Returns the removed value, or `None` if the key was absent.
    fn remove_key(&self, key: &K) -> Option<T>;

    /// The (first) key holding an `==` value.
    ///
    /// Linear reverse lookup; O(n).
    fn key_for_value(&self, item: &T) -> Option<K>;

    /// Whether `key` currently maps to a value.
    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a value and its key via reverse lookup.
    ///
    /// Errors with [`Error::MissingValue`] if no `==` value is held.
    fn remove_value(&self, item: &T) -> Result<()> {
        match self.key_for_value(item) {
            Some(key) => {
                self.remove_key(&key);
                Ok(())
            }
            None => Err(Error::MissingValue),
        }
    }
}
