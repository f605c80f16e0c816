//! Ordered, duplicate-permitting storage backend.

use kelp_core::{
    dispatch_added, dispatch_removed, dispatch_snapshot, Collection, CollectionObserver, Error,
    KeyedCollection, ObserverRegistry, Result, SubscriberFn, SubscriptionId, SubscriptionManager,
};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::slice;

/// An ordered collection backed by a dense vector.
///
/// Properties:
/// - ordered: items keep insertion order
/// - indexed: every item has an integer key
/// - can hold the same item several times
///
/// `ListColl` is a cheap-to-clone handle; clones share contents and
/// observers.
pub struct ListColl<T: Clone + PartialEq + 'static> {
    inner: Rc<RefCell<ListInner<T>>>,
}

struct ListInner<T: Clone + PartialEq + 'static> {
    items: Vec<T>,
    observers: ObserverRegistry<T>,
    subscribers: SubscriptionManager<T>,
}

impl<T: Clone + PartialEq + 'static> Clone for ListColl<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + PartialEq + 'static> Default for ListColl<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> ListColl<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Creates a list holding `items`.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                items,
                observers: ObserverRegistry::new(),
                subscribers: SubscriptionManager::new(),
            })),
        }
    }

    /// Creates a list copying another collection's current contents.
    pub fn from_coll(source: &dyn Collection<T>) -> Self {
        Self::from_vec(source.contents())
    }

    // Notification plumbing. Storage is already updated and no interior
    // borrow is held when these run, so callbacks may re-enter.

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

    // Silent mutations used by operators that reconstruct or pre-position
    // their backend before emitting a hand-computed delta.

    pub(crate) fn set_contents_silent(&self, items: Vec<T>) {
        self.inner.borrow_mut().items = items;
    }

    pub(crate) fn insert_silent(&self, index: usize, item: T) {
        self.inner.borrow_mut().items.insert(index, item);
    }

    /// Removes every occurrence of each listed item without notifying.
    /// Returns the occurrences actually removed.
    pub(crate) fn take_every_silent(&self, items: &[T]) -> Vec<T> {
        let mut inner = self.inner.borrow_mut();
        let mut removed = Vec::new();
        for item in items {
            let before = inner.items.len();
            inner.items.retain(|probe| probe != item);
            for _ in 0..before - inner.items.len() {
                removed.push(item.clone());
            }
        }
        removed
    }

    /// Binary search for the insertion position of `item` under `compare`,
    /// assuming the list is already sorted by it. A new item lands before
    /// its equals.
    pub(crate) fn sorted_index_by(&self, item: &T, compare: &dyn Fn(&T, &T) -> Ordering) -> usize {
        self.inner
            .borrow()
            .items
            .partition_point(|probe| compare(item, probe) == Ordering::Greater)
    }
}

impl<T: Clone + PartialEq + 'static> Collection<T> for ListColl<T> {
    fn length(&self) -> usize {
        self.inner.borrow().items.len()
    }

    fn contents(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }

    fn contains(&self, item: &T) -> bool {
        self.inner.borrow().items.contains(item)
    }

    /// Appends to the end of the list. The same item may be added several
    /// times.
    fn add(&self, item: T) {
        self.inner.borrow_mut().items.push(item.clone());
        self.emit_added(slice::from_ref(&item));
    }

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
        let count = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.items.len();
            inner.items.retain(|probe| probe != item);
            before - inner.items.len()
        };
        if count > 0 {
            self.emit_removed(&vec![item.clone(); count]);
        }
        count
    }

    fn add_all(&self, items: &[T]) {
        if items.is_empty() {
            return;
        }
        self.inner.borrow_mut().items.extend_from_slice(items);
        self.emit_added(items);
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

    // Direct-index overrides; the snapshot-based defaults would be O(n).

    fn first(&self) -> Option<T> {
        self.inner.borrow().items.first().cloned()
    }

    fn last(&self) -> Option<T> {
        self.inner.borrow().items.last().cloned()
    }

    fn get_index(&self, index: usize) -> Option<T> {
        self.inner.borrow().items.get(index).cloned()
    }

    fn get_index_range(&self, index: usize, len: usize) -> Vec<T> {
        let inner = self.inner.borrow();
        let start = index.min(inner.items.len());
        let end = (index + len).min(inner.items.len());
        inner.items[start..end].to_vec()
    }
}

impl<T: Clone + PartialEq + 'static> KeyedCollection<usize, T> for ListColl<T> {
    /// Sets the value at position `index`.
    ///
    /// `index == length` appends. Dense storage cannot represent gaps, so
    /// `index > length` errors instead of extending.
    fn set(&self, index: usize, item: T) -> Result<()> {
        enum Outcome<T> {
            Noop,
            Replaced(T),
            Appended,
        }
        let outcome = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.items.len();
            if index < len {
                if inner.items[index] == item {
                    Outcome::Noop
                } else {
                    let old = std::mem::replace(&mut inner.items[index], item.clone());
                    Outcome::Replaced(old)
                }
            } else if index == len {
                inner.items.push(item.clone());
                Outcome::Appended
            } else {
                return Err(Error::index_out_of_bounds(index, len));
            }
        };
        match outcome {
            Outcome::Noop => {}
            Outcome::Replaced(old) => {
                self.emit_removed(slice::from_ref(&old));
                self.emit_added(slice::from_ref(&item));
            }
            Outcome::Appended => self.emit_added(slice::from_ref(&item)),
        }
        Ok(())
    }

    fn get(&self, index: &usize) -> Option<T> {
        self.inner.borrow().items.get(*index).cloned()
    }

    /// Removes the item at `index`, shifting the tail down by one.
    fn remove_key(&self, index: &usize) -> Option<T> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if *index < inner.items.len() {
                Some(inner.items.remove(*index))
            } else {
                None
            }
        };
        if let Some(item) = &removed {
            self.emit_removed(slice::from_ref(item));
        }
        removed
    }

    fn key_for_value(&self, item: &T) -> Option<usize> {
        self.inner.borrow().items.iter().position(|probe| probe == item)
    }
}

impl<T: Clone + PartialEq + 'static> FromIterator<T> for ListColl<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}
