//! Whole-collection transform operator, maintained by recompute-and-diff.

use crate::list::ListColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::rc::Rc;

/// A live collection computed by a whole-collection transform.
///
/// Unlike the per-delta operators, the transform recomputes the entire
/// result on every source change and diffs it against the previous state,
/// so downstream observers still receive only the difference. This is the
/// accepted fallback for derivations with no cheap incremental rule
/// (windowing, reversal); prefer a per-delta operator where one exists.
pub struct TransformColl<T: Clone + PartialEq + 'static> {
    glue: Rc<TransformGlue<T>>,
}

struct TransformGlue<T: Clone + PartialEq + 'static> {
    result: ListColl<T>,
    source: Rc<dyn Collection<T>>,
    transform_fn: Box<dyn Fn(&[T]) -> Vec<T>>,
}

impl<T: Clone + PartialEq + 'static> TransformGlue<T> {
    fn recalculate(&self) {
        let old_items = self.result.contents();
        let new_items = (self.transform_fn)(&self.source.contents());
        self.result.set_contents_silent(new_items.clone());

        let added: Vec<T> = new_items
            .iter()
            .filter(|item| !old_items.contains(item))
            .cloned()
            .collect();
        let removed: Vec<T> = old_items
            .iter()
            .filter(|item| !new_items.contains(item))
            .cloned()
            .collect();
        // items that stayed but changed position are reported on both sides
        let old_common: Vec<&T> = old_items
            .iter()
            .filter(|item| new_items.contains(item))
            .collect();
        let new_common: Vec<&T> = new_items
            .iter()
            .filter(|item| old_items.contains(item))
            .collect();
        let moved: Vec<T> = new_common
            .iter()
            .zip(old_common.iter())
            .filter(|(new, old)| new != old)
            .map(|(new, _)| (**new).clone())
            .collect();

        if !added.is_empty() || !moved.is_empty() {
            let mut batch = added;
            batch.extend(moved.iter().cloned());
            self.result.emit_added(&batch);
        }
        if !removed.is_empty() || !moved.is_empty() {
            let mut batch = removed;
            batch.extend(moved);
            self.result.emit_removed(&batch);
        }
    }
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for TransformGlue<T> {
    fn added(&self, _items: &[T], _coll: &dyn Collection<T>) {
        self.recalculate();
    }

    fn removed(&self, _items: &[T], _coll: &dyn Collection<T>) {
        self.recalculate();
    }
}

impl<T: Clone + PartialEq + 'static> TransformColl<T> {
    /// Creates the live transform of `source` through `transform_fn`.
    pub fn new(
        source: Rc<dyn Collection<T>>,
        transform_fn: impl Fn(&[T]) -> Vec<T> + 'static,
    ) -> Self {
        let glue = Rc::new(TransformGlue {
            result: ListColl::new(),
            source: source.clone(),
            transform_fn: Box::new(transform_fn),
        });

        let initial = (glue.transform_fn)(&source.contents());
        glue.result.set_contents_silent(initial);

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        source.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &ListColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Clone for TransformColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for TransformColl<T> => backend);
