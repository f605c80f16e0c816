//! Union operator: superset of any number of sources, without duplicates.

use crate::distinct::DistinctColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::cell::RefCell;
use std::rc::Rc;

/// A live set union of its sources.
///
/// E.g. A = abcd, B = bdef, then the merge = abcdef.
///
/// An item appears once no matter how many sources hold it, and it survives
/// removal from one source as long as any tracked source still contains it.
pub struct MergedColl<T: Clone + PartialEq + 'static> {
    glue: Rc<MergeGlue<T>>,
}

struct MergeGlue<T: Clone + PartialEq + 'static> {
    result: DistinctColl<T>,
    sources: RefCell<Vec<Rc<dyn Collection<T>>>>,
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for MergeGlue<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        // the result backend de-duplicates and reports only fresh items
        self.result.add_all(items);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        // survival rule: an item leaves the union only once no tracked
        // source contains it anymore (the reporting source has already
        // applied its removal, so duplicates inside it still count)
        let evict: Vec<T> = {
            let sources = self.sources.borrow();
            items
                .iter()
                .filter(|item| !sources.iter().any(|source| source.contains(item)))
                .cloned()
                .collect()
        };
        self.result.remove_all(&evict);
    }
}

impl<T: Clone + PartialEq + 'static> MergedColl<T> {
    /// Creates a union with no sources yet.
    pub fn new() -> Self {
        Self {
            glue: Rc::new(MergeGlue {
                result: DistinctColl::new(),
                sources: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Starts tracking another source.
    ///
    /// Its current contents are admitted immediately (reported to observers
    /// as an added batch, minus items already present) and its future
    /// changes are folded in.
    pub fn add_source(&self, source: Rc<dyn Collection<T>>) {
        self.glue.sources.borrow_mut().push(source.clone());
        let initial = source.contents();
        self.glue.result.add_all(&initial);
        let observer: Rc<dyn CollectionObserver<T>> = self.glue.clone();
        source.register_observer(observer);
    }

    /// The number of tracked sources.
    pub fn source_count(&self) -> usize {
        self.glue.sources.borrow().len()
    }

    fn backend(&self) -> &DistinctColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Default for MergedColl<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> Clone for MergedColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for MergedColl<T> => backend);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListColl;
    use crate::operators::CollectionExt;
    use crate::testutil::recording;

    fn sorted(mut items: Vec<&str>) -> Vec<&str> {
        items.sort();
        items
    }

    #[test]
    fn test_initial_union_deduplicates() {
        let a = ListColl::from_vec(vec!["a", "b", "c"]);
        let b = ListColl::from_vec(vec!["a", "b", "f"]);

        let merged = a.merge(&b);

        assert_eq!(merged.length(), 4);
        assert_eq!(sorted(merged.contents()), vec!["a", "b", "c", "f"]);
    }

    #[test]
    fn test_added_item_appears_once() {
        let a = ListColl::from_vec(vec!["a"]);
        let b = ListColl::from_vec(vec!["b"]);
        let merged = a.merge(&b);

        let rec = recording::<&str>();
        merged.register_observer(rec.clone());

        a.add("h");
        assert_eq!(rec.added_flat(), vec!["h"]);

        b.add("h");
        // already present via a: no second addition
        assert_eq!(rec.added_flat(), vec!["h"]);
        assert_eq!(merged.length(), 3);
    }

    #[test]
    fn test_survival_rule_across_sources() {
        let a = ListColl::from_vec(vec!["x", "y"]);
        let b = ListColl::from_vec(vec!["x", "z"]);
        let merged = a.merge(&b);

        let rec = recording::<&str>();
        merged.register_observer(rec.clone());

        a.remove(&"x");
        // x is still in b, so it must survive
        assert!(merged.contains(&"x"));
        assert!(rec.removed_batches().is_empty());

        b.remove(&"x");
        assert!(!merged.contains(&"x"));
        assert_eq!(rec.removed_flat(), vec!["x"]);
    }

    #[test]
    fn test_survival_rule_within_one_source() {
        let a = ListColl::from_vec(vec!["x", "x"]);
        let b = ListColl::new();
        let merged = a.merge(&b);

        a.remove(&"x");
        // a still holds one x
        assert!(merged.contains(&"x"));

        a.remove(&"x");
        assert!(!merged.contains(&"x"));
    }

    #[test]
    fn test_union_invariant_after_mutations() {
        let a = ListColl::from_vec(vec![1, 2, 3]);
        let b = ListColl::from_vec(vec![3, 4]);
        let merged = a.merge(&b);

        a.add(5);
        b.remove(&3);
        a.remove(&1);
        b.add(6);

        let mut expected: Vec<i32> = a.contents();
        for item in b.contents() {
            if !expected.contains(&item) {
                expected.push(item);
            }
        }
        expected.sort();
        let mut actual = merged.contents();
        actual.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_nary_merge() {
        use crate::operators::merge_coll;

        let a = ListColl::from_vec(vec!["a"]);
        let b = ListColl::from_vec(vec!["b"]);
        let c = ListColl::from_vec(vec!["a", "c"]);

        let merged = merge_coll(&[a.share(), b.share(), c.share()]);

        assert_eq!(merged.source_count(), 3);
        assert_eq!(sorted(merged.contents()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_source_later_reports_new_items() {
        let a = ListColl::from_vec(vec!["a"]);
        let merged = a.merge(&ListColl::<&str>::new());

        let rec = recording::<&str>();
        merged.register_observer(rec.clone());

        let c = ListColl::from_vec(vec!["a", "c"]);
        merged.add_source(c.share());

        assert_eq!(rec.added_flat(), vec!["c"]);
        assert_eq!(merged.length(), 2);
    }

    #[test]
    fn test_dropped_merge_stops_tracking() {
        let a = ListColl::from_vec(vec![1]);
        {
            let merged = a.merge(&ListColl::<i32>::new());
            assert_eq!(merged.length(), 1);
        }
        // merge dropped: its glue observer is gone, mutation must not panic
        a.add(2);
        assert_eq!(a.contents(), vec![1, 2]);
    }
}
