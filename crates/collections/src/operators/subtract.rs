//! Set-difference operator.

use crate::list::ListColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::rc::Rc;

/// A live set difference: all items of `base` apart from those in
/// `excluded`, in `base`'s order.
///
/// E.g. A = abcd, B = bdef, then A minus B = ac.
pub struct SubtractColl<T: Clone + PartialEq + 'static> {
    glue: Rc<SubtractGlue<T>>,
    // the two sources hold these only weakly
    _base_observer: Rc<BaseObserver<T>>,
    _excluded_observer: Rc<ExcludedObserver<T>>,
}

struct SubtractGlue<T: Clone + PartialEq + 'static> {
    result: ListColl<T>,
    base: Rc<dyn Collection<T>>,
    excluded: Rc<dyn Collection<T>>,
}

impl<T: Clone + PartialEq + 'static> SubtractGlue<T> {
    /// Rebuilds the materialized result positionally from `base`'s current
    /// contents. A plain append would break order preservation, so inserts
    /// go through this full reconstruction and the caller reports the net
    /// items itself.
    fn reconstruct(&self) {
        let rebuilt: Vec<T> = self
            .base
            .contents()
            .into_iter()
            .filter(|item| !self.excluded.contains(item))
            .collect();
        self.result.set_contents_silent(rebuilt);
    }
}

struct BaseObserver<T: Clone + PartialEq + 'static>(Rc<SubtractGlue<T>>);

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for BaseObserver<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        let glue = &self.0;
        let fresh: Vec<T> = items
            .iter()
            .filter(|item| !glue.excluded.contains(item))
            .cloned()
            .collect();
        if !fresh.is_empty() {
            glue.reconstruct();
            glue.result.emit_added(&fresh);
        }
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        let glue = &self.0;
        // items excluded via `excluded` were never in the result; removing
        // them again would be wrong
        let gone: Vec<T> = items
            .iter()
            .filter(|item| !glue.excluded.contains(item))
            .cloned()
            .collect();
        glue.result.remove_all(&gone);
    }
}

struct ExcludedObserver<T: Clone + PartialEq + 'static>(Rc<SubtractGlue<T>>);

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for ExcludedObserver<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        // a newly-excluded item leaves the result entirely, duplicate
        // occurrences included
        let glue = &self.0;
        let removed = glue.result.take_every_silent(items);
        glue.result.emit_removed(&removed);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        let glue = &self.0;
        let back: Vec<T> = items
            .iter()
            .filter(|item| glue.base.contains(item) && !glue.excluded.contains(item))
            .cloned()
            .collect();
        if !back.is_empty() {
            glue.reconstruct();
            glue.result.emit_added(&back);
        }
    }
}

impl<T: Clone + PartialEq + 'static> SubtractColl<T> {
    /// Creates the live difference `base \ excluded`.
    pub fn new(base: Rc<dyn Collection<T>>, excluded: Rc<dyn Collection<T>>) -> Self {
        let glue = Rc::new(SubtractGlue {
            result: ListColl::new(),
            base,
            excluded,
        });
        glue.reconstruct();

        let base_observer = Rc::new(BaseObserver(glue.clone()));
        let excluded_observer = Rc::new(ExcludedObserver(glue.clone()));
        let observer: Rc<dyn CollectionObserver<T>> = base_observer.clone();
        glue.base.register_observer(observer);
        let observer: Rc<dyn CollectionObserver<T>> = excluded_observer.clone();
        glue.excluded.register_observer(observer);

        Self {
            glue,
            _base_observer: base_observer,
            _excluded_observer: excluded_observer,
        }
    }

    fn backend(&self) -> &ListColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Clone for SubtractColl<T> {
    fn clone(&self) -> Self {
        Self {
            glue: self.glue.clone(),
            _base_observer: self._base_observer.clone(),
            _excluded_observer: self._excluded_observer.clone(),
        }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for SubtractColl<T> => backend);
