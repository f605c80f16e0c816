//! Concatenation operator: superset of any number of sources, duplicates
//! retained.

use crate::list::ListColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::cell::RefCell;
use std::rc::Rc;

/// A live concatenation of its sources.
///
/// E.g. A = abcd, B = bdef, then the concatenation = abcdbdef.
///
/// Unlike [`MergedColl`](crate::operators::MergedColl) there is no
/// de-duplication and no cross-source survival check: a removal removes
/// exactly the reported occurrences.
pub struct ConcatColl<T: Clone + PartialEq + 'static> {
    glue: Rc<ConcatGlue<T>>,
}

struct ConcatGlue<T: Clone + PartialEq + 'static> {
    result: ListColl<T>,
    sources: RefCell<Vec<Rc<dyn Collection<T>>>>,
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for ConcatGlue<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        self.result.add_all(items);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        self.result.remove_all(items);
    }
}

impl<T: Clone + PartialEq + 'static> ConcatColl<T> {
    /// Creates a concatenation with no sources yet.
    pub fn new() -> Self {
        Self {
            glue: Rc::new(ConcatGlue {
                result: ListColl::new(),
                sources: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Appends another source's current contents and tracks its changes.
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

    fn backend(&self) -> &ListColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Default for ConcatColl<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq + 'static> Clone for ConcatColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for ConcatColl<T> => backend);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::ListColl;
    use crate::operators::{concat_coll, CollectionExt};
    use crate::testutil::recording;

    #[test]
    fn test_concat_keeps_duplicates_and_order() {
        let a = ListColl::from_vec(vec!["a", "b", "c"]);
        let b = ListColl::from_vec(vec!["a", "b", "f"]);

        let concat = a.concat(&b);

        assert_eq!(concat.length(), 6);
        assert_eq!(concat.contents(), vec!["a", "b", "c", "a", "b", "f"]);
    }

    #[test]
    fn test_source_add_appends() {
        let a = ListColl::from_vec(vec!["a", "b", "c"]);
        let b = ListColl::from_vec(vec!["a", "b", "f"]);
        let concat = a.concat(&b);

        let rec = recording::<&str>();
        concat.register_observer(rec.clone());

        a.add("d");

        assert_eq!(rec.added_flat(), vec!["d"]);
        assert_eq!(concat.length(), 7);
    }

    #[test]
    fn test_removal_removes_one_occurrence() {
        let a = ListColl::from_vec(vec!["a", "b"]);
        let b = ListColl::from_vec(vec!["a"]);
        let concat = a.concat(&b);

        a.remove(&"a");

        // b's occurrence of "a" must remain
        assert_eq!(concat.contents(), vec!["b", "a"]);
    }

    #[test]
    fn test_round_trip_matches_sources() {
        let a = ListColl::from_vec(vec![1, 2]);
        let b = ListColl::from_vec(vec![2, 3]);
        let concat = a.concat(&b);

        a.add(4);
        b.remove(&2);
        a.remove(&1);
        b.add(5);

        let mut expected = a.contents();
        expected.extend(b.contents());
        let mut actual = concat.contents();
        actual.sort();
        expected.sort();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_nary_concat() {
        let a = ListColl::from_vec(vec!["a"]);
        let b = ListColl::from_vec(vec!["b"]);
        let c = ListColl::from_vec(vec!["a"]);

        let concat = concat_coll(&[a.share(), b.share(), c.share()]);

        assert_eq!(concat.source_count(), 3);
        assert_eq!(concat.contents(), vec!["a", "b", "a"]);
    }
}
