//! Filter operators.
//!
//! Two variants with the same membership rule but different triggers:
//! [`FilteredColl`] re-tests items only when the source adds or removes
//! them, while [`LiveFilterColl`] also subscribes to each item's own change
//! notification and moves items in or out when their properties change.

use crate::list::ListColl;
use crate::operators::delegate_collection;
use kelp_core::{ChangeListener, Collection, CollectionObserver, ObservableItem};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A live subset of a source collection, selected by a predicate.
///
/// Item property changes after insertion are never reconsidered; this is the
/// cheap variant kept for sources whose items are plain values.
pub struct FilteredColl<T: Clone + PartialEq + 'static> {
    glue: Rc<FilterGlue<T>>,
}

struct FilterGlue<T: Clone + PartialEq + 'static> {
    result: ListColl<T>,
    _source: Rc<dyn Collection<T>>,
    predicate: Box<dyn Fn(&T) -> bool>,
}

impl<T: Clone + PartialEq + 'static> CollectionObserver<T> for FilterGlue<T> {
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        let admit: Vec<T> = items
            .iter()
            .filter(|item| (self.predicate)(item))
            .cloned()
            .collect();
        self.result.add_all(&admit);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        let present: Vec<T> = items
            .iter()
            .filter(|item| self.result.contains(item))
            .cloned()
            .collect();
        self.result.remove_all(&present);
    }
}

impl<T: Clone + PartialEq + 'static> FilteredColl<T> {
    /// Creates the live subset of `source` for which `predicate` holds.
    pub fn new(source: Rc<dyn Collection<T>>, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        let glue = Rc::new(FilterGlue {
            result: ListColl::new(),
            _source: source.clone(),
            predicate: Box::new(predicate),
        });

        let initial: Vec<T> = source
            .contents()
            .into_iter()
            .filter(|item| (glue.predicate)(item))
            .collect();
        glue.result.add_all(&initial);

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        source.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &ListColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + 'static> Clone for FilteredColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + 'static] Collection<T> for FilteredColl<T> => backend);

/// A live subset that follows item property changes.
///
/// Every source item gets a change listener for as long as it stays in the
/// source; when an item reports a change, the predicate is re-evaluated and
/// the item moves into or out of the result accordingly.
pub struct LiveFilterColl<T: Clone + PartialEq + ObservableItem + 'static> {
    glue: Rc<LiveFilterGlue<T>>,
}

struct LiveFilterGlue<T: Clone + PartialEq + ObservableItem + 'static> {
    result: ListColl<T>,
    _source: Rc<dyn Collection<T>>,
    predicate: Box<dyn Fn(&T) -> bool>,
    // one entry per source occurrence; holds the listener strongly
    listeners: RefCell<Vec<(T, ChangeListener)>>,
    weak_self: Weak<LiveFilterGlue<T>>,
}

impl<T: Clone + PartialEq + ObservableItem + 'static> LiveFilterGlue<T> {
    fn attach(&self, item: &T) {
        let weak = self.weak_self.clone();
        let probe = item.clone();
        let listener: ChangeListener = Rc::new(move || {
            if let Some(glue) = weak.upgrade() {
                glue.reevaluate(&probe);
            }
        });
        item.add_change_listener(&listener);
        self.listeners.borrow_mut().push((item.clone(), listener));
    }

    fn detach(&self, item: &T) {
        let entry = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter()
                .position(|(probe, _)| probe == item)
                .map(|pos| listeners.remove(pos))
        };
        if let Some((probe, listener)) = entry {
            probe.remove_change_listener(&listener);
        }
    }

    fn reevaluate(&self, item: &T) {
        let matches = (self.predicate)(item);
        let present = self.result.contains(item);
        if matches && !present {
            self.result.add(item.clone());
        } else if !matches && present {
            self.result.remove(item);
        }
    }
}

impl<T: Clone + PartialEq + ObservableItem + 'static> CollectionObserver<T>
    for LiveFilterGlue<T>
{
    fn added(&self, items: &[T], _coll: &dyn Collection<T>) {
        for item in items {
            self.attach(item);
        }
        let admit: Vec<T> = items
            .iter()
            .filter(|item| (self.predicate)(item))
            .cloned()
            .collect();
        self.result.add_all(&admit);
    }

    fn removed(&self, items: &[T], _coll: &dyn Collection<T>) {
        for item in items {
            self.detach(item);
        }
        let present: Vec<T> = items
            .iter()
            .filter(|item| self.result.contains(item))
            .cloned()
            .collect();
        self.result.remove_all(&present);
    }
}

impl<T: Clone + PartialEq + ObservableItem + 'static> LiveFilterColl<T> {
    /// Creates the item-tracking live subset of `source`.
    pub fn new(source: Rc<dyn Collection<T>>, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        let glue = Rc::new_cyclic(|weak| LiveFilterGlue {
            result: ListColl::new(),
            _source: source.clone(),
            predicate: Box::new(predicate),
            listeners: RefCell::new(Vec::new()),
            weak_self: weak.clone(),
        });

        let initial = source.contents();
        for item in &initial {
            glue.attach(item);
        }
        let admit: Vec<T> = initial
            .into_iter()
            .filter(|item| (glue.predicate)(item))
            .collect();
        glue.result.add_all(&admit);

        let observer: Rc<dyn CollectionObserver<T>> = glue.clone();
        source.register_observer(observer);

        Self { glue }
    }

    fn backend(&self) -> &ListColl<T> {
        &self.glue.result
    }
}

impl<T: Clone + PartialEq + ObservableItem + 'static> Clone for LiveFilterColl<T> {
    fn clone(&self) -> Self {
        Self { glue: self.glue.clone() }
    }
}

delegate_collection!(impl[T: Clone + PartialEq + ObservableItem + 'static] Collection<T> for LiveFilterColl<T> => backend);
