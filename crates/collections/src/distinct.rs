//! Unordered, duplicate-free storage backend.

use kelp_core::{
    dispatch_added, dispatch_removed, dispatch_snapshot, Collection, CollectionObserver,
    ObserverRegistry, SubscriberFn, SubscriptionId, SubscriptionManager,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::slice;

/// A collection which holds each item at most once.
///
/// Properties:
/// - not ordered (first-seen order is incidental, not contractual)
/// - can *not* hold the same item several times
///
/// Items are only required to be `PartialEq`, so membership is a linear
/// scan over a dense vector rather than a hash lookup.
pub struct DistinctColl<T: Clone + PartialEq + 'static> {
    inner: Rc<RefCell<DistinctInner<T>>>,
}

struct DistinctInner<T: Clone + PartialEq + 'static> {
    items: Vec<T>,
    observers: ObserverRegistry<T>,
    subscribers: SubscriptionManager<T>,
}

impl<T: Clone + PartialEq + 'static> Clone for DistinctColl<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + PartialEq + 'static> Default for DistinctColl<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> DistinctColl<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DistinctInner {
                items: Vec::new(),
                observers: ObserverRegistry::new(),
                subscribers: SubscriptionManager::new(),
            })),
        }
    }

    /// Creates a set from `items`, keeping the first occurrence of each.
    pub fn from_vec(items: Vec<T>) -> Self {
        let set = Self::new();
        {
            let mut inner = set.inner.borrow_mut();
            for item in items {
                if !inner.items.contains(&item) {
                    inner.items.push(item);
                }
            }
        }
        set
    }

    /// Creates a set from another collection's current contents.
    pub fn from_coll(source: &dyn Collection<T>) -> Self {
        Self::from_vec(source.contents())
    }

    pub(crate) fn emit_added(&self, items: &[T]) {
        if items.is_empty() {
            return;
        }
        let observers = self.inner.borrow_mut().observers.snapshot();
        dispatch_added(&observers, items, self);
        self.emit_subscribers();
    }

    pub(crate) fn emit_removed(&self, items: &[T]) {
        if items.is_empty() {
            return;
        }
        let observers = self.inner.borrow_mut().observers.snapshot();
        dispatch_removed(&observers, items, self);
        self.emit_subscribers();
    }

    fn emit_subscribers(&self) {
        let subscribers = self.inner.borrow().subscribers.snapshot();
        if subscribers.is_empty() {
            return;
        }
        let contents = self.contents();
        for subscriber in &subscribers {
            dispatch_snapshot(subscriber, &contents);
        }
    }
}

impl<T: Clone + PartialEq + 'static> Collection<T> for DistinctColl<T> {
    fn length(&self) -> usize {
        self.inner.borrow().items.len()
    }

    fn contents(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }

    fn contains(&self, item: &T) -> bool {
        self.inner.borrow().items.contains(item)
    }

    /// Adds the item. If an `==` item is already present this is a silent
    /// no-op; otherwise exactly one added item is reported.
    fn add(&self, item: T) {
        let inserted = {
            let mut inner = self.inner.borrow_mut();
            if inner.items.contains(&item) {
                false
            } else {
                inner.items.push(item.clone());
                true
            }
        };
        if inserted {
            self.emit_added(slice::from_ref(&item));
        }
    }

    /// Removes all trace of the item (at most one copy can exist).
    /// Reports a removal only if something was actually removed.
    fn remove(&self, item: &T) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            match inner.items.iter().position(|probe| probe == item) {
                Some(pos) => {
                    inner.items.remove(pos);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.emit_removed(slice::from_ref(item));
        }
        removed
    }

    fn remove_every(&self, item: &T) -> usize {
        usize::from(self.remove(item))
    }

    fn add_all(&self, items: &[T]) {
        let fresh = {
            let mut inner = self.inner.borrow_mut();
            let mut fresh = Vec::new();
            for item in items {
                if !inner.items.contains(item) {
                    inner.items.push(item.clone());
                    fresh.push(item.clone());
                }
            }
            fresh
        };
        self.emit_added(&fresh);
    }

    fn remove_all(&self, items: &[T]) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let mut removed = Vec::new();
            for item in items {
                if let Some(pos) = inner.items.iter().position(|probe| probe == item) {
                    inner.items.remove(pos);
                    removed.push(item.clone());
                }
            }
            removed
        };
        self.emit_removed(&removed);
    }

    fn clear(&self) {
        let old = std::mem::take(&mut self.inner.borrow_mut().items);
        self.emit_removed(&old);
    }

    fn register_observer(&self, observer: Rc<dyn CollectionObserver<T>>) {
        self.inner.borrow_mut().observers.register(observer);
    }

    fn unregister_observer(&self, observer: &Rc<dyn CollectionObserver<T>>) {
        self.inner.borrow_mut().observers.unregister(observer);
    }

    fn subscribe_callback(&self, callback: SubscriberFn<T>) -> SubscriptionId {
        let id = self.inner.borrow_mut().subscribers.subscribe(callback.clone());
        dispatch_snapshot(&callback, &self.contents());
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().subscribers.unsubscribe(id)
    }
}

impl<T: Clone + PartialEq + 'static> FromIterator<T> for DistinctColl<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::recording;

    #[test]
    fn test_add_deduplicates_silently() {
        let set = DistinctColl::new();
        let rec = recording::<&str>();
        set.register_observer(rec.clone());

        set.add("a");
        set.add("b");
        set.add("a");

        assert_eq!(set.length(), 2);
        assert_eq!(rec.added_batches(), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_remove_reports_only_real_removals() {
        let set = DistinctColl::from_vec(vec!["a", "b"]);
        let rec = recording::<&str>();
        set.register_observer(rec.clone());

        assert!(set.remove(&"a"));
        assert!(!set.remove(&"a"));

        assert_eq!(rec.removed_batches(), vec![vec!["a"]]);
        assert_eq!(set.contents(), vec!["b"]);
    }

    #[test]
    fn test_add_all_batches_fresh_items_only() {
        let set = DistinctColl::from_vec(vec!["a"]);
        let rec = recording::<&str>();
        set.register_observer(rec.clone());

        set.add_all(&["a", "b", "b", "c"]);

        assert_eq!(set.length(), 3);
        assert_eq!(rec.added_batches(), vec![vec!["b", "c"]]);
    }

    #[test]
    fn test_from_vec_keeps_first_occurrences() {
        let set = DistinctColl::from_vec(vec![2, 1, 2, 3, 1]);
        assert_eq!(set.contents(), vec![2, 1, 3]);
    }

    #[test]
    fn test_clear() {
        let set = DistinctColl::from_vec(vec![1, 2]);
        let rec = recording::<i32>();
        set.register_observer(rec.clone());

        set.clear();

        assert!(set.is_empty());
        assert_eq!(rec.removed_batches(), vec![vec![1, 2]]);
    }
}
