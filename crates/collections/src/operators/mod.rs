//! Derived-collection operators.
//!
//! Each operator is a live collection whose contents are a continuously
//! maintained function of one or more source collections: it materializes an
//! initial state at construction, registers glue observers on its sources,
//! applies an operator-specific incremental rule on every upstream delta,
//! and re-emits only the net changes to its own observers.
//!
//! Operators are built by composition: every operator owns a plain storage
//! backend for its materialized result and implements [`Collection`] by
//! delegating to it, so a derived collection is itself a valid source for
//! further operators. Operators hold strong references to their sources for
//! their whole lifetime (they must, to keep receiving updates); conversely a
//! source only holds its glue observer weakly, so dropping every handle to a
//! derived collection disconnects it.

use kelp_core::{Collection, ObservableItem, SubscriptionId};
use std::cmp::Ordering;
use std::rc::Rc;

pub mod concat;
pub mod dedup;
pub mod filter;
pub mod intersect;
pub mod merge;
pub mod project;
pub mod sort;
pub mod subtract;
pub mod transform;
pub mod xor;

pub use concat::ConcatColl;
pub use dedup::DedupColl;
pub use filter::{FilteredColl, LiveFilterColl};
pub use intersect::IntersectColl;
pub use merge::MergedColl;
pub use project::ProjectedColl;
pub use sort::SortedColl;
pub use subtract::SubtractColl;
pub use transform::TransformColl;
pub use xor::not_in_common_coll;

/// Implements [`Collection`] for an operator handle by delegating every
/// required method to its result backend (reached via a `backend()`
/// accessor). Query and observation both flow through the backend; the
/// operator handle exists to keep the glue observers and sources alive.
macro_rules! delegate_collection {
    (impl[$($gen:tt)*] Collection<$item:ty> for $ty:ty => $backend:ident) => {
        impl<$($gen)*> ::kelp_core::Collection<$item> for $ty {
            fn length(&self) -> usize {
                self.$backend().length()
            }
            fn contents(&self) -> ::std::vec::Vec<$item> {
                self.$backend().contents()
            }
            fn contains(&self, item: &$item) -> bool {
                self.$backend().contains(item)
            }
            fn add(&self, item: $item) {
                self.$backend().add(item)
            }
            fn remove(&self, item: &$item) -> bool {
                self.$backend().remove(item)
            }
            fn remove_every(&self, item: &$item) -> usize {
                self.$backend().remove_every(item)
            }
            fn add_all(&self, items: &[$item]) {
                self.$backend().add_all(items)
            }
            fn remove_all(&self, items: &[$item]) {
                self.$backend().remove_all(items)
            }
            fn clear(&self) {
                self.$backend().clear()
            }
            fn register_observer(
                &self,
                observer: ::std::rc::Rc<dyn ::kelp_core::CollectionObserver<$item>>,
            ) {
                self.$backend().register_observer(observer)
            }
            fn unregister_observer(
                &self,
                observer: &::std::rc::Rc<dyn ::kelp_core::CollectionObserver<$item>>,
            ) {
                self.$backend().unregister_observer(observer)
            }
            fn subscribe_callback(
                &self,
                callback: ::kelp_core::SubscriberFn<$item>,
            ) -> ::kelp_core::SubscriptionId {
                self.$backend().subscribe_callback(callback)
            }
            fn unsubscribe(&self, id: ::kelp_core::SubscriptionId) -> bool {
                self.$backend().unsubscribe(id)
            }
        }
    };
}
pub(crate) use delegate_collection;

/// Derivation surface available on every collection handle.
///
/// Every method returns a new live collection that keeps itself consistent
/// with this one. Implemented blanket-wise for any cloneable
/// [`Collection`], so operator results chain the same way backends do.
pub trait CollectionExt<T: Clone + PartialEq + 'static>:
    Collection<T> + Clone + Sized + 'static
{
    /// Wraps a clone of this handle as a shared source for operators.
    fn share(&self) -> Rc<dyn Collection<T>> {
        Rc::new(self.clone())
    }

    /// A live subset of this collection: items for which `predicate` holds.
    ///
    /// Items are re-tested when the source adds or removes them; property
    /// changes after insertion are never reconsidered. Use
    /// [`filter_live`](CollectionExt::filter_live) for that.
    fn filter<F>(&self, predicate: F) -> FilteredColl<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        FilteredColl::new(self.share(), predicate)
    }

    /// A live subset that additionally tracks each item's own change
    /// notification and moves items in or out when their properties change.
    fn filter_live<F>(&self, predicate: F) -> LiveFilterColl<T>
    where
        T: ObservableItem,
        F: Fn(&T) -> bool + 'static,
    {
        LiveFilterColl::new(self.share(), predicate)
    }

    /// A live projection: `project_fn` applied to each item, in source order.
    fn project<U, F>(&self, project_fn: F) -> ProjectedColl<T, U>
    where
        U: Clone + PartialEq + 'static,
        F: Fn(&T) -> U + 'static,
    {
        ProjectedColl::new(self.share(), project_fn)
    }

    /// A live sorted rendition of this collection under a three-way
    /// comparator.
    fn sorted_by<F>(&self, compare: F) -> SortedColl<T>
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        SortedColl::new(self.share(), compare)
    }

    /// Like [`sorted_by`](CollectionExt::sorted_by), with a boolean
    /// "a before b" comparator.
    fn sorted_by_less<F>(&self, less: F) -> SortedColl<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        SortedColl::new(self.share(), move |a, b| {
            if less(a, b) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        })
    }

    /// A live sorted rendition ordered by an extracted key.
    fn sorted_by_key<K, F>(&self, key_fn: F) -> SortedColl<T>
    where
        K: Ord,
        F: Fn(&T) -> K + 'static,
    {
        SortedColl::new(self.share(), move |a, b| key_fn(a).cmp(&key_fn(b)))
    }

    /// Appends `other`: all items of both collections, duplicates retained,
    /// this collection's items first.
    fn concat<C>(&self, other: &C) -> ConcatColl<T>
    where
        C: CollectionExt<T>,
    {
        concat_coll(&[self.share(), other.share()])
    }

    /// Set union with `other`: items appearing in either collection, once.
    fn merge<C>(&self, other: &C) -> MergedColl<T>
    where
        C: CollectionExt<T>,
    {
        merge_coll(&[self.share(), other.share()])
    }

    /// Set difference: this collection's items without those in `excluded`,
    /// preserving this collection's order.
    fn subtract<C>(&self, excluded: &C) -> SubtractColl<T>
    where
        C: CollectionExt<T>,
    {
        SubtractColl::new(self.share(), excluded.share())
    }

    /// Set intersection: items contained in *both* collections.
    fn in_common<C>(&self, other: &C) -> IntersectColl<T>
    where
        C: CollectionExt<T>,
    {
        IntersectColl::new(self.share(), other.share())
    }

    /// Symmetric difference: items contained in exactly one of the two
    /// collections.
    fn not_in_common<C>(&self, other: &C) -> SubtractColl<T>
    where
        C: CollectionExt<T>,
    {
        not_in_common_coll(self.share(), other.share())
    }

    /// A live deduplication of this collection under `==`.
    fn unique(&self) -> DedupColl<T> {
        DedupColl::new(self.share())
    }

    /// A live deduplication under a caller-supplied equality function.
    fn unique_by<F>(&self, equal: F) -> DedupColl<T>
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        DedupColl::with_equality(self.share(), equal)
    }

    /// A live whole-collection transform, maintained by recompute-and-diff.
    ///
    /// Suited to low-frequency sources; per-delta operators are cheaper when
    /// one applies.
    fn transform<F>(&self, transform_fn: F) -> TransformColl<T>
    where
        F: Fn(&[T]) -> Vec<T> + 'static,
    {
        TransformColl::new(self.share(), transform_fn)
    }

    /// A live window of up to `len` items starting at `start`.
    fn slice(&self, start: usize, len: usize) -> TransformColl<T> {
        self.transform(move |items| {
            items.iter().skip(start).take(len).cloned().collect()
        })
    }

    /// A live reversed rendition of this collection.
    fn reversed(&self) -> TransformColl<T> {
        self.transform(|items| items.iter().rev().cloned().collect())
    }

    /// Store-style subscription sugar over
    /// [`Collection::subscribe_callback`].
    fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&[T]) + 'static,
    {
        self.subscribe_callback(Rc::new(callback))
    }
}

impl<T, C> CollectionExt<T> for C
where
    T: Clone + PartialEq + 'static,
    C: Collection<T> + Clone + 'static,
{
}

/// Union of any number of sources, each item counted once.
pub fn merge_coll<T: Clone + PartialEq + 'static>(
    sources: &[Rc<dyn Collection<T>>],
) -> MergedColl<T> {
    let merged = MergedColl::new();
    for source in sources {
        merged.add_source(source.clone());
    }
    merged
}

/// Concatenation of any number of sources, duplicates retained.
pub fn concat_coll<T: Clone + PartialEq + 'static>(
    sources: &[Rc<dyn Collection<T>>],
) -> ConcatColl<T> {
    let concat = ConcatColl::new();
    for source in sources {
        concat.add_source(source.clone());
    }
    concat
}

/// Set difference `base \ excluded`, preserving `base`'s order.
pub fn subtract_coll<T: Clone + PartialEq + 'static>(
    base: Rc<dyn Collection<T>>,
    excluded: Rc<dyn Collection<T>>,
) -> SubtractColl<T> {
    SubtractColl::new(base, excluded)
}

/// Set intersection of two sources.
pub fn in_common_coll<T: Clone + PartialEq + 'static>(
    left: Rc<dyn Collection<T>>,
    right: Rc<dyn Collection<T>>,
) -> IntersectColl<T> {
    IntersectColl::new(left, right)
}
