//! Cross-operator integration: chained derivations, lifetimes,
//! subscriptions.

use kelp_collections::{CollectionExt, DictColl, ListColl};
use kelp_core::Collection;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn chained_operators_propagate_transitively() {
    let source = ListColl::from_vec(vec![5, 2, 8, 3]);
    let evens = source.filter(|n: &i32| n % 2 == 0);
    let sorted = evens.sorted_by(|a: &i32, b: &i32| a.cmp(b));

    assert_eq!(sorted.contents(), vec![2, 8]);

    source.add(4);
    source.add(7);
    assert_eq!(sorted.contents(), vec![2, 4, 8]);

    source.remove(&2);
    assert_eq!(sorted.contents(), vec![4, 8]);
}

#[test]
fn downstream_operator_keeps_intermediate_alive() {
    let source = ListColl::from_vec(vec![1, 2, 3]);
    let sorted = {
        let evens = source.filter(|n: &i32| n % 2 == 0);
        evens.sorted_by(|a: &i32, b: &i32| a.cmp(b))
        // the filter handle goes out of scope here
    };

    source.add(6);
    source.add(4);

    // the sorted collection still tracks through the dropped filter handle,
    // because it holds the intermediate as its source
    assert_eq!(sorted.contents(), vec![2, 4, 6]);
}

#[test]
fn dropped_chain_disconnects_cleanly() {
    let source = ListColl::from_vec(vec![1, 2, 3]);
    {
        let evens = source.filter(|n: &i32| n % 2 == 0);
        let _sorted = evens.sorted_by(|a: &i32, b: &i32| a.cmp(b));
    }

    // the whole chain is gone; mutating the source must not fail
    source.add(4);
    assert_eq!(source.contents(), vec![1, 2, 3, 4]);
}

#[test]
fn subscription_on_derived_collection_replays_and_tracks() {
    let source = ListColl::from_vec(vec![3, 1]);
    let sorted = source.sorted_by(|a: &i32, b: &i32| a.cmp(b));

    let seen: Rc<RefCell<Vec<Vec<i32>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = sorted.subscribe(move |contents: &[i32]| {
        sink.borrow_mut().push(contents.to_vec());
    });

    // immediate replay of the current sorted value
    assert_eq!(*seen.borrow(), vec![vec![1, 3]]);

    source.add(2);
    assert_eq!(seen.borrow().last().unwrap(), &vec![1, 2, 3]);

    assert!(sorted.unsubscribe(id));
    source.add(9);
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn keyed_backend_feeds_operators() {
    let dict = DictColl::new();
    dict.insert("w", "walnut");
    dict.insert("p", "pecan");
    dict.insert("a", "almond");

    let sorted = dict.sorted_by(|a: &&str, b: &&str| a.cmp(b));
    assert_eq!(sorted.contents(), vec!["almond", "pecan", "walnut"]);

    dict.insert("c", "cashew");
    assert_eq!(sorted.contents(), vec!["almond", "cashew", "pecan", "walnut"]);

    // replacing a value reports remove + add, which the chain absorbs
    dict.insert("p", "pistachio");
    assert_eq!(
        sorted.contents(),
        vec!["almond", "cashew", "pistachio", "walnut"]
    );
}

#[test]
fn projection_feeds_dedup() {
    let source = ListColl::from_vec(vec!["apple", "avocado", "banana"]);
    let initials = source.project(|s: &&str| s.chars().next().unwrap());
    let unique = initials.unique();

    let mut contents = unique.contents();
    contents.sort_unstable();
    assert_eq!(contents, vec!['a', 'b']);

    source.remove(&"apple");
    // avocado still projects to 'a'
    assert!(unique.contains(&'a'));

    source.remove(&"avocado");
    assert_eq!(unique.contents(), vec!['b']);
}

#[test]
fn merge_of_derived_collections() {
    let a = ListColl::from_vec(vec![1, 2, 3, 4]);
    let small = a.filter(|n: &i32| *n <= 2);
    let large = a.filter(|n: &i32| *n >= 3);
    let rejoined = small.merge(&large);

    let mut contents = rejoined.contents();
    contents.sort_unstable();
    assert_eq!(contents, vec![1, 2, 3, 4]);

    a.add(5);
    assert!(rejoined.contains(&5));

    a.remove(&1);
    assert!(!rejoined.contains(&1));
}
