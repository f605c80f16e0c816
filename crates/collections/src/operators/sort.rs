//! Sort operator.

use crate::list::ListColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::cmp::Ordering;
use std::rc::Rc;

/// A live sorted rendition of a source collection.
///
/// New items are placed by binary search over the already-sorted result
/// (O(log n) search, O(n) shift) instead of re-sorting, and removals delete
/// directly since removal preserves sortedness. Equal items keep their
/// arrival order stable apart from a new item landing before its equals.
pub struct SortedColl<T: Clone + PartialEq + 'static> {
    glue: Rc<SortGlue<T>>,
}

struct SortGlue<T: Clone + PartialEq + 'static> {
    result: ListColl<T>,
    _source: Rc<dyn Collection<T>>,
    compare: Box<dyn Fn(&T, &T) -> Ordering>,
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for SortGlue<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        for item in items {
            let pos = self.result.sorted_index_by(item, &*self.compare);
            self.result.insert_silent(pos, item.clone());
        }
        self.result.emit_added(items);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        self.result.remove_all(items);
    }
}

impl<T: Clone + PartialEq + 'static> SortedColl<T> {
    /// Creates the live sorted rendition of `source` under `compare`.
    pub fn new(source: Rc<dyn Collection<T>>, compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        let glue = Rc::new(SortGlue {
            result: ListColl::new(),
            _source: source.clone(),
            compare: Box::new(compare),
        });

        let mut initial = source.contents();
        initial.sort_by(|a, b| (glue.compare)(a, b));
        glue.result.set_contents_silent(initial);

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        source.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &ListColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Clone for SortedColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for SortedColl<T> => backend);
