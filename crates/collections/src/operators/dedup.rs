//! Deduplication operator with a pluggable equality policy.

use crate::distinct::DistinctColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::rc::Rc;

/// A live deduplication of one source collection.
///
/// Each item is contained only once, under `==` by default or under a
/// caller-supplied equality function. Removal follows the survival rule
/// against the source itself: an item is evicted only when no remaining
/// source occurrence is still equal to it.
pub struct DedupColl<T: Clone + PartialEq + 'static> {
    glue: Rc<DedupGlue<T>>,
}

struct DedupGlue<T: Clone + PartialEq + 'static> {
    result: DistinctColl<T>,
    source: Rc<dyn Collection<T>>,
    equal: Option<Box<dyn Fn(&T, &T) -> bool>>,
}

impl<T: Clone + PartialEq + 'static> DedupGlue<T> {
    fn is_equal(&self, a: &T, b: &T) -> bool {
        match &self.equal {
            Some(equal) => equal(a, b),
            None => a == b,
        }
    }

    fn admit(&self, items: &[T]) {
        let mut fresh: Vec<T> = Vec::new();
        let existing = self.result.contents();
        for item in items {
            let seen = existing
                .iter()
                .chain(fresh.iter())
                .any(|probe| self.is_equal(probe, item));
            if !seen {
                fresh.push(item.clone());
            }
        }
        self.result.add_all(&fresh);
    }
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for DedupGlue<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        self.admit(items);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        // the source has already applied the removal; anything still equal
        // in it keeps the representative alive. Eviction targets the stored
        // representative, which under a custom policy need not be `==` to
        // the removed item.
        let remaining = self.source.contents();
        let held = self.result.contents();
        let mut evict: Vec<T> = Vec::new();
        for item in items {
            if remaining.iter().any(|probe| self.is_equal(probe, item)) {
                continue;
            }
            for representative in &held {
                if self.is_equal(representative, item) && !evict.contains(representative) {
                    evict.push(representative.clone());
                }
            }
        }
        self.result.remove_all(&evict);
    }
}

impl<T: Clone + PartialEq + 'static> DedupColl<T> {
    /// Creates a live deduplication of `source` under `==`.
    pub fn new(source: Rc<dyn Collection<T>>) -> Self {
        Self::build(source, None)
    }

    /// Creates a live deduplication under a caller-supplied equality
    /// function, e.g. `|a, b| a.id == b.id`.
    pub fn with_equality(
        source: Rc<dyn Collection<T>>,
        equal: impl Fn(&T, &T) -> bool + 'static,
    ) -> Self {
        Self::build(source, Some(Box::new(equal)))
    }

    fn build(source: Rc<dyn Collection<T>>, equal: Option<Box<dyn Fn(&T, &T) -> bool>>) -> Self {
        let glue = Rc::new(DedupGlue {
            result: DistinctColl::new(),
            source: source.clone(),
            equal,
        });

        glue.admit(&source.contents());

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        source.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &DistinctColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Clone for DedupColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for DedupColl<T> => backend);
