//! Kelp Core - Observer contract and notification machinery for kelp collections.
//!
//! This crate defines the contracts every kelp collection is built on:
//!
//! - [`Collection`] / [`KeyedCollection`]: the base operations every storage
//!   backend and every derived collection implements
//! - [`CollectionObserver`]: the two-callback observer registered on a
//!   collection to receive added/removed batches
//! - [`ObserverRegistry`]: weakly-held, registration-ordered observer set
//!   with panic-isolated dispatch
//! - [`SubscriptionManager`]: store-style single-callback subscriptions with
//!   immediate current-value replay
//! - [`ObservableItem`] / [`ChangeNotifier`]: per-item change notification
//!   for item-tracking operators
//!
//! # Notification discipline
//!
//! A mutation fully updates backend storage and releases all interior
//! borrows before its observers run, so observer callbacks may re-entrantly
//! mutate the same or another collection. One logical mutation batch
//! produces exactly one `added`/`removed` dispatch carrying the whole batch.
//! A panicking callback is caught at the dispatch site, logged via `log`,
//! and never reaches the mutating caller or later observers.

pub mod collection;
pub mod error;
pub mod item;
pub mod observer;
pub mod registry;
pub mod subscription;

pub use collection::{Collection, KeyedCollection};
pub use error::{Error, Result};
pub use item::{ChangeListener, ChangeNotifier, ObservableItem};
pub use observer::{dispatch_added, dispatch_removed, dispatch_snapshot, CollectionObserver};
pub use registry::ObserverRegistry;
pub use subscription::{SubscriberFn, Subscription, SubscriptionId, SubscriptionManager};
