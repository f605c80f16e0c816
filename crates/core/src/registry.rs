//! Observer registry embedded in every collection.
//!
//! The registry holds weak references: registering an observer does not keep
//! it alive, so observer lifetime stays the owner's responsibility. Derived
//! collections exploit this: dropping every handle to an operator drops its
//! glue observer, which silently unregisters it from further updates.

use crate::observer::CollectionObserver;
use std::rc::{Rc, Weak};

/// A set of weakly-held observers, notified in registration order.
pub struct ObserverRegistry<T: Clone + PartialEq + 'static> {
    observers: Vec<Weak<dyn CollectionObserver<T>>>,
}

impl<T: Clone + PartialEq + 'static> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> ObserverRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    /// Registers an observer.
    ///
    /// Identity is `Rc` pointer identity; registering the same observer twice
    /// is a no-op. Returns whether the observer was newly registered.
    pub fn register(&mut self, observer: Rc<dyn CollectionObserver<T>>) -> bool {
        let ptr = Rc::as_ptr(&observer) as *const ();
        if self.observers.iter().any(|w| w.as_ptr() as *const () == ptr) {
            return false;
        }
        self.observers.push(Rc::downgrade(&observer));
        true
    }

    /// Unregisters an observer if present.
    ///
    /// Returns whether the observer was found and removed.
    pub fn unregister(&mut self, observer: &Rc<dyn CollectionObserver<T>>) -> bool {
        let ptr = Rc::as_ptr(observer) as *const ();
        let before = self.observers.len();
        self.observers.retain(|w| w.as_ptr() as *const () != ptr);
        self.observers.len() != before
    }

    /// Upgrades the live observers for dispatch, pruning dead entries.
    ///
    /// The returned snapshot is dispatched outside any interior borrow of the
    /// emitting collection, so callbacks may mutate it re-entrantly.
    pub fn snapshot(&mut self) -> Vec<Rc<dyn CollectionObserver<T>>> {
        let mut live = Vec::with_capacity(self.observers.len());
        self.observers.retain(|w| match w.upgrade() {
            Some(observer) => {
                live.push(observer);
                true
            }
            None => false,
        });
        live
    }

    /// Returns the number of registered entries, dead ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if no observers are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::Collection;
    use std::cell::RefCell;

    struct CountingObserver {
        added: RefCell<usize>,
    }

    impl CollectionObserver<i32> for CountingObserver {
        fn added(&self, items: &[i32], _coll: &dyn Collection<i32>) {
            *self.added.borrow_mut() += items.len();
        }

        fn removed(&self, _items: &[i32], _coll: &dyn Collection<i32>) {}
    }

    fn counting() -> Rc<dyn CollectionObserver<i32>> {
        Rc::new(CountingObserver { added: RefCell::new(0) })
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry: ObserverRegistry<i32> = ObserverRegistry::new();
        let obs = counting();

        assert!(registry.register(obs.clone()));
        assert!(!registry.register(obs.clone()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry: ObserverRegistry<i32> = ObserverRegistry::new();
        let obs = counting();

        registry.register(obs.clone());
        assert!(registry.unregister(&obs));
        assert!(!registry.unregister(&obs));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_distinct_observers_both_kept() {
        let mut registry: ObserverRegistry<i32> = ObserverRegistry::new();
        let a = counting();
        let b = counting();

        registry.register(a.clone());
        registry.register(b.clone());
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.snapshot().len(), 2);
    }

    #[test]
    fn test_dropped_observer_pruned_on_snapshot() {
        let mut registry: ObserverRegistry<i32> = ObserverRegistry::new();
        let a = counting();
        registry.register(a.clone());

        {
            let transient = counting();
            registry.register(transient.clone());
            assert_eq!(registry.len(), 2);
        }

        let live = registry.snapshot();
        assert_eq!(live.len(), 1);
        assert_eq!(registry.len(), 1);
    }
}
