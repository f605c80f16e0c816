//! Projection operator.

use crate::list::ListColl;
use crate::operators::delegate_collection;
use kelp_core::{Collection, CollectionObserver};
use std::rc::Rc;

/// A live projection: `project_fn` applied to each source item, in source
/// order.
///
/// Removal works by recomputing the projection of the removed items and
/// removing matching values from the result. That is only correct when
/// `project_fn` is pure and its output is meaningfully comparable by `==`;
/// projecting to values that are never `==` to a recomputation of themselves
/// breaks removal.
pub struct ProjectedColl<T: Clone + PartialEq + 'static, U: Clone + PartialEq + 'static> {
    glue: Rc<ProjectGlue<T, U>>,
}

struct ProjectGlue<T: Clone + PartialEq + 'static, U: Clone + PartialEq + 'static> {
    result: ListColl<U>,
    _source: Rc<dyn Collection<T>>,
    project_fn: Box<dyn Fn(&T) -> U>,
}

impl<T, U> CollectionObserver<T> for ProjectGlue<T, U>
where
    T: Clone + PartialEq + 'static,
    U: Clone + PartialEq + 'static,
{
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        let mapped: Vec<U> = items.iter().map(|item| (self.project_fn)(item)).collect();
        self.result.add_all(&mapped);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        let mapped: Vec<U> = items.iter().map(|item| (self.project_fn)(item)).collect();
        self.result.remove_all(&mapped);
    }
}

impl<T, U> ProjectedColl<T, U>
where
    T: Clone + PartialEq + 'static,
    U: Clone + PartialEq + 'static,
{
    /// Creates the live projection of `source` through `project_fn`.
    pub fn new(source: Rc<dyn Collection<T>>, project_fn: impl Fn(&T) -> U + 'static) -> Self {
        let glue = Rc::new(ProjectGlue {
            result: ListColl::new(),
            _source: source.clone(),
            project_fn: Box::new(project_fn),
        });

        let initial: Vec<U> = source
            .contents()
            .iter()
            .map(|item| (glue.project_fn)(item))
            .collect();
        glue.result.add_all(&initial);

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        source.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &ListColl<U> {
        &self.glue.result
    }
}

impl<T, U> Clone for ProjectedColl<T, U>
where
    T: Clone + PartialEq + 'static,
    U: Clone + PartialEq + 'static,
{
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static, U: Clone + PartialEq + 'static] Collection<U> for ProjectedColl<T, U> => backend);
