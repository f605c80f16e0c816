//! Store-style subscriptions to collection changes.
//!
//! Unlike [`crate::registry::ObserverRegistry`], subscribers are held
//! strongly and identified by id; they receive a fresh contents snapshot
//! rather than per-mutation deltas, and are replayed the current value
//! immediately upon subscribing.

use hashbrown::HashMap;
use std::rc::Rc;

/// Unique identifier for a subscription.
pub type SubscriptionId = u64;

/// Callback type for store-style subscribers.
///
/// Invoked with a fresh snapshot of the collection's contents.
pub type SubscriberFn<T> = Rc<dyn Fn(&[T])>;

/// A single subscription to collection changes.
pub struct Subscription<T> {
    id: SubscriptionId,
    callback: SubscriberFn<T>,
}

impl<T> Subscription<T> {
    /// Creates a new subscription.
    pub fn new(id: SubscriptionId, callback: SubscriberFn<T>) -> Self {
        Self { id, callback }
    }

    /// Returns the subscription id.
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the callback.
    #[inline]
    pub fn callback(&self) -> &SubscriberFn<T> {
        &self.callback
    }
}

/// Manages store-style subscriptions for one collection.
pub struct SubscriptionManager<T> {
    subscriptions: HashMap<SubscriptionId, Subscription<T>>,
    next_id: SubscriptionId,
}

impl<T> Default for SubscriptionManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriptionManager<T> {
    /// Creates a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a subscriber callback and returns its id.
    pub fn subscribe(&mut self, callback: SubscriberFn<T>) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions.insert(id, Subscription::new(id, callback));
        id
    }

    /// Removes a subscription by id.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Clones out the current callbacks for dispatch.
    pub fn snapshot(&self) -> Vec<SubscriberFn<T>> {
        self.subscriptions.values().map(|s| s.callback().clone()).collect()
    }

    /// Returns the number of active subscriptions.
    #[inline]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if there are no subscriptions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Drops all subscriptions.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_subscribe_assigns_increasing_ids() {
        let mut manager: SubscriptionManager<i32> = SubscriptionManager::new();

        let id1 = manager.subscribe(Rc::new(|_| {}));
        let id2 = manager.subscribe(Rc::new(|_| {}));

        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut manager: SubscriptionManager<i32> = SubscriptionManager::new();

        let id = manager.subscribe(Rc::new(|_| {}));
        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_snapshot_invokes_all() {
        let mut manager: SubscriptionManager<i32> = SubscriptionManager::new();

        let count = Rc::new(RefCell::new(0));
        let c1 = count.clone();
        let c2 = count.clone();
        manager.subscribe(Rc::new(move |_| *c1.borrow_mut() += 1));
        manager.subscribe(Rc::new(move |_| *c2.borrow_mut() += 1));

        for callback in manager.snapshot() {
            callback.as_ref()(&[1, 2, 3]);
        }
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_clear() {
        let mut manager: SubscriptionManager<i32> = SubscriptionManager::new();
        manager.subscribe(Rc::new(|_| {}));
        manager.subscribe(Rc::new(|_| {}));

        manager.clear();
        assert!(manager.is_empty());
    }
}
