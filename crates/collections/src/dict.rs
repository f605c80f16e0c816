//! Key-addressed storage backend.

use hashbrown::HashMap;
use kelp_core::{
    dispatch_added, dispatch_removed, dispatch_snapshot, Collection, CollectionObserver,
    KeyedCollection, ObserverRegistry, Result, SubscriberFn, SubscriptionId, SubscriptionManager,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::slice;

/// A collection which maps unique string keys to items.
///
/// Properties:
/// - not ordered
/// - can *not* hold the same key several times (values may repeat under
///   different keys)
///
/// Key normalization beyond `Into<String>` is the caller's concern.
pub struct DictColl<T: Clone + PartialEq + 'static> {
    inner: Rc<RefCell<DictInner<T>>>,
}

struct DictInner<T: Clone + PartialEq + 'static> {
    map: HashMap<String, T>,
    // cursor for add()'s auto-assigned integral keys
    next_free: u64,
    observers: ObserverRegistry<T>,
    subscribers: SubscriptionManager<T>,
}

impl<T: Clone + PartialEq + 'static> Clone for DictColl<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: Clone + PartialEq + 'static> Default for DictColl<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> DictColl<T> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DictInner {
                map: HashMap::new(),
                next_free: 0,
                observers: ObserverRegistry::new(),
                subscribers: SubscriptionManager::new(),
            })),
        }
    }

    /// Current keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().map.keys().cloned().collect()
    }

    /// Current key/value pairs, in no particular order.
    pub fn entries(&self) -> Vec<(String, T)> {
        self.inner
            .borrow()
            .map
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Sets the value for `key`. See [`KeyedCollection::set`]; the map form
    /// cannot fail, so this inherent version drops the `Result`.
    pub fn insert(&self, key: impl Into<String>, item: T) {
        self.set_impl(key.into(), item);
    }

    fn set_impl(&self, key: String, item: T) {
        let old = {
            let mut inner = self.inner.borrow_mut();
            // same value under the same key: no mutation, no notification
            if inner.map.get(&key).is_some_and(|existing| *existing == item) {
                return;
            }
            inner.map.insert(key, item.clone())
        };
        if let Some(old) = old {
            self.emit_removed(slice::from_ref(&old));
        }
        self.emit_added(slice::from_ref(&item));
    }

    fn emit_added(&self, items: &[T]) {
        if items.is_empty() {
            return;
        }
        let observers = self.inner.borrow_mut().observers.snapshot();
        dispatch_added(&observers, items, self);
        self.emit_subscribers();
    }

    fn emit_removed(&self, items: &[T]) {
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

    fn next_free_key(inner: &mut DictInner<T>) -> String {
        let mut candidate = inner.next_free;
        while inner.map.contains_key(&candidate.to_string()) {
            candidate += 1;
        }
        inner.next_free = candidate + 1;
        candidate.to_string()
    }
}

impl<T: Clone + PartialEq + 'static> Collection<T> for DictColl<T> {
    fn length(&self) -> usize {
        self.inner.borrow().map.len()
    }

    fn contents(&self) -> Vec<T> {
        self.inner.borrow().map.values().cloned().collect()
    }

    fn contains(&self, item: &T) -> bool {
        self.inner.borrow().map.values().any(|probe| probe == item)
    }

    /// Stores the item under the next free integral key.
    ///
    /// Key-addressed storage has no natural append; prefer
    /// [`DictColl::insert`] with an explicit key.
    fn add(&self, item: T) {
        {
            let mut inner = self.inner.borrow_mut();
            let key = Self::next_free_key(&mut inner);
            inner.map.insert(key, item.clone());
        }
        self.emit_added(slice::from_ref(&item));
    }

    /// Removes one key holding an `==` value, if any.
    fn remove(&self, item: &T) -> bool {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let key = inner
                .map
                .iter()
                .find(|(_, probe)| *probe == item)
                .map(|(k, _)| k.clone());
            match key {
                Some(key) => inner.map.remove(&key).is_some(),
                None => false,
            }
        };
        if removed {
            self.emit_removed(slice::from_ref(item));
        }
        removed
    }

    /// Removes every key holding an `==` value.
    fn remove_every(&self, item: &T) -> usize {
        let count = {
            let mut inner = self.inner.borrow_mut();
            let keys: Vec<String> = inner
                .map
                .iter()
                .filter(|(_, probe)| *probe == item)
                .map(|(k, _)| k.clone())
                .collect();
            for key in &keys {
                inner.map.remove(key);
            }
            keys.len()
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
        {
            let mut inner = self.inner.borrow_mut();
            for item in items {
                let key = Self::next_free_key(&mut inner);
                inner.map.insert(key, item.clone());
            }
        }
        self.emit_added(items);
    }

    fn remove_all(&self, items: &[T]) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let mut removed = Vec::new();
            for item in items {
                let key = inner
                    .map
                    .iter()
                    .find(|(_, probe)| *probe == item)
                    .map(|(k, _)| k.clone());
                if let Some(key) = key {
                    inner.map.remove(&key);
                    removed.push(item.clone());
                }
            }
            removed
        };
        self.emit_removed(&removed);
    }

    fn clear(&self) {
        let old: Vec<T> = {
            let mut inner = self.inner.borrow_mut();
            let map = std::mem::take(&mut inner.map);
            map.into_values().collect()
        };
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

impl<T: Clone + PartialEq + 'static> KeyedCollection<String, T> for DictColl<T> {
    fn set(&self, key: String, item: T) -> Result<()> {
        self.set_impl(key, item);
        Ok(())
    }

    fn get(&self, key: &String) -> Option<T> {
        self.inner.borrow().map.get(key).cloned()
    }

    fn remove_key(&self, key: &String) -> Option<T> {
        let removed = self.inner.borrow_mut().map.remove(key);
        if let Some(item) = &removed {
            self.emit_removed(slice::from_ref(item));
        }
        removed
    }

    /// Linear reverse lookup; O(n) over the whole map.
    fn key_for_value(&self, item: &T) -> Option<String> {
        self.inner
            .borrow()
            .map
            .iter()
            .find(|(_, probe)| *probe == item)
            .map(|(k, _)| k.clone())
    }
}
