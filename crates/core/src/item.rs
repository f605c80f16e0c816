//! Per-item change notification.
//!
//! Items that announce their own property changes can participate in
//! item-tracking operators (the live filter re-evaluates its predicate when
//! an item changes). Items are typically shared handles (`Rc`-backed), so
//! clones held by a source collection and by an operator report through the
//! same notifier.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// Listener invoked when an item's properties change.
pub type ChangeListener = Rc<dyn Fn()>;

/// An item that exposes its own change notification.
pub trait ObservableItem {
    /// Adds a change listener. Idempotent per `Rc` identity.
    fn add_change_listener(&self, listener: &ChangeListener);

    /// Removes a change listener if present, no-op otherwise.
    fn remove_change_listener(&self, listener: &ChangeListener);
}

/// Weakly-held listener set an item embeds to implement [`ObservableItem`].
///
/// Listeners are stored weakly: the subscribing side owns the strong
/// reference and tears it down when the item leaves its view.
#[derive(Default)]
pub struct ChangeNotifier {
    listeners: std::cell::RefCell<Vec<Weak<dyn Fn()>>>,
}

impl ChangeNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener by `Rc` identity.
    pub fn add(&self, listener: &ChangeListener) {
        let ptr = Rc::as_ptr(listener) as *const ();
        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|w| w.as_ptr() as *const () == ptr) {
            return;
        }
        listeners.push(Rc::downgrade(listener));
    }

    /// Removes a listener by `Rc` identity.
    pub fn remove(&self, listener: &ChangeListener) {
        let ptr = Rc::as_ptr(listener) as *const ();
        self.listeners.borrow_mut().retain(|w| w.as_ptr() as *const () != ptr);
    }

    /// Invokes every live listener, pruning dead ones and isolating panics.
    pub fn notify(&self) {
        let live: Vec<ChangeListener> = {
            let mut listeners = self.listeners.borrow_mut();
            let mut live = Vec::with_capacity(listeners.len());
            listeners.retain(|w| match w.upgrade() {
                Some(listener) => {
                    live.push(listener);
                    true
                }
                None => false,
            });
            live
        };
        for listener in live {
            let callback: &dyn Fn() = listener.as_ref();
            let result = catch_unwind(AssertUnwindSafe(callback));
            if let Err(payload) = result {
                log::error!("item change listener panicked: {}", panic_message(payload.as_ref()));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("opaque panic payload")
}
