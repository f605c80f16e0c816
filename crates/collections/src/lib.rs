//! Kelp Collections - Live collection backends and derived-collection
//! operators.
//!
//! This crate implements an in-memory, observer-based live collection
//! engine. Three storage backends notify registered observers of
//! element-level additions and removals:
//!
//! - [`ListColl`]: ordered, integer-indexed, duplicates permitted
//! - [`DistinctColl`]: unordered, duplicate-free
//! - [`DictColl`]: unique string keys mapping to items
//!
//! On top of them, the operator library derives new collections whose
//! contents are a continuously maintained function of one or more sources:
//! union ([`MergedColl`]), concatenation ([`ConcatColl`]), set difference
//! ([`SubtractColl`]), intersection ([`IntersectColl`]), symmetric
//! difference ([`not_in_common_coll`]), filtering ([`FilteredColl`],
//! [`LiveFilterColl`]), projection ([`ProjectedColl`]), sorting
//! ([`SortedColl`]), deduplication ([`DedupColl`]) and whole-collection
//! transforms ([`TransformColl`]). Each operator subscribes to its sources
//! and applies an incremental update rule per delta, never a full
//! recomputation, while emitting minimal added/removed batches to its own
//! observers, so operators chain freely.
//!
//! # Example
//!
//! ```
//! use kelp_collections::{CollectionExt, ListColl};
//! use kelp_core::Collection;
//!
//! let tasks = ListColl::from_vec(vec!["write", "review", "ship"]);
//! let sorted = tasks.sorted_by(|a, b| a.cmp(b));
//! assert_eq!(sorted.contents(), vec!["review", "ship", "write"]);
//!
//! tasks.add("deploy");
//! assert_eq!(sorted.contents(), vec!["deploy", "review", "ship", "write"]);
//! ```
//!
//! All propagation is push-based and synchronous: a mutation returns only
//! after every downstream operator and observer has been brought up to
//! date. The engine is single-threaded; handles are `Rc`-backed and cheap
//! to clone.

pub mod dict;
pub mod distinct;
pub mod list;
pub mod operators;

pub use dict::DictColl;
pub use distinct::DistinctColl;
pub use list::ListColl;
pub use operators::{
    concat_coll, in_common_coll, merge_coll, not_in_common_coll, subtract_coll, CollectionExt,
    ConcatColl, DedupColl, FilteredColl, IntersectColl, LiveFilterColl, MergedColl, ProjectedColl,
    SortedColl, SubtractColl, TransformColl,
};

// Re-export the contract types so depending on this crate alone suffices.
pub use kelp_core::{
    ChangeListener, ChangeNotifier, Collection, CollectionObserver, Error, KeyedCollection,
    ObservableItem, Result, SubscriberFn, SubscriptionId,
};

#[cfg(test)]
pub(crate) mod testutil;
