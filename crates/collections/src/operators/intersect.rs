//! Intersection operator.

use crate::distinct::DistinctColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::rc::Rc;

/// A live set intersection: only those items contained in *both* sources.
///
/// E.g. A = abcd, B = bdef, then the intersection = bd.
pub struct IntersectColl<T: Clone + PartialEq + 'static> {
    glue: Rc<IntersectGlue<T>>,
}

struct IntersectGlue<T: Clone + PartialEq + 'static> {
    result: DistinctColl<T>,
    left: Rc<dyn Collection<T>>,
    right: Rc<dyn Collection<T>>,
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for IntersectGlue<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        let admit: Vec<T> = items
            .iter()
            .filter(|item| self.left.contains(item) && self.right.contains(item))
            .cloned()
            .collect();
        // the backend skips items already admitted via the other source
        self.result.add_all(&admit);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        // once gone from either source, membership in the other is moot
        self.result.remove_all(items);
    }
}

impl<T: Clone + PartialEq + 'static> IntersectColl<T> {
    /// Creates the live intersection of `left` and `right`.
    pub fn new(left: Rc<dyn Collection<T>>, right: Rc<dyn Collection<T>>) -> Self {
        let glue = Rc::new(IntersectGlue {
            result: DistinctColl::new(),
            left,
            right,
        });

        let initial: Vec<T> = glue
            .left
            .contents()
            .into_iter()
            .filter(|item| glue.right.contains(item))
            .collect();
        glue.result.add_all(&initial);

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        glue.left.register_observer(observer.clone());
        glue.right.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &DistinctColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Clone for IntersectColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for IntersectColl<T> => backend);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListColl;
    use crate::operators::CollectionExt;
    use crate::testutil::recording;

    #[test]
    fn test_initial_intersection() {
        let a = ListColl::from_vec(vec!["a", "b", "c"]);
        let b = ListColl::from_vec(vec!["a", "e", "f"]);

        let common = a.in_common(&b);

        assert_eq!(common.contents(), vec!["a"]);
    }

    #[test]
    fn test_removal_from_either_source_fires_removed() {
        let a = ListColl::from_vec(vec!["a", "b", "c"]);
        let b = ListColl::from_vec(vec!["a", "e", "f"]);
        let common = a.in_common(&b);

        let rec = recording::<&str>();
        common.register_observer(rec.clone());

        b.remove(&"a");

        assert!(common.is_empty());
        assert_eq!(rec.removed_batches(), vec![vec!["a"]]);
    }

    #[test]
    fn test_item_added_to_both_sources_appears_once() {
        let a = ListColl::from_vec(vec!["a"]);
        let b = ListColl::from_vec(vec!["b"]);
        let common = a.in_common(&b);
        assert!(common.is_empty());

        let rec = recording::<&str>();
        common.register_observer(rec.clone());

        a.add("x");
        assert!(common.is_empty());

        b.add("x");
        assert_eq!(common.contents(), vec!["x"]);
        assert_eq!(rec.added_batches(), vec![vec!["x"]]);
    }

    #[test]
    fn test_intersection_invariant_after_mutations() {
        let a = ListColl::from_vec(vec![1, 2, 3, 4]);
        let b = ListColl::from_vec(vec![3, 4, 5]);
        let common = a.in_common(&b);

        a.add(5);
        b.remove(&3);
        b.add(2);
        a.remove(&4);

        let mut expected: Vec<i32> = a
            .contents()
            .into_iter()
            .filter(|item| b.contains(item))
            .collect();
        expected.dedup();
        expected.sort();
        let mut actual = common.contents();
        actual.sort();
        assert_eq!(actual, expected);
    }
}
