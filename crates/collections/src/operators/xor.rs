//! Symmetric difference, built compositionally.

use crate::operators::{in_common_coll, merge_coll, SubtractColl};
use kelp_core::Collection;
use std::rc::Rc;

/// A live symmetric difference: items contained only in `left` or only in
/// `right`, but not in both.
///
/// Composed as `(left ∪ right) \ (left ∩ right)` rather than maintained by
/// a third incremental rule; the union and intersection stay alive as the
/// difference's sources, at the cost of one extra hop in the observer chain.
pub fn not_in_common_coll<T: Clone + PartialEq + 'static>(
    left: Rc<dyn Collection<T>>,
    right: Rc<dyn Collection<T>>,
) -> SubtractColl<T> {
    let union = merge_coll(&[left.clone(), right.clone()]);
    let common = in_common_coll(left, right);
    SubtractColl::new(Rc::new(union), Rc::new(common))
}
