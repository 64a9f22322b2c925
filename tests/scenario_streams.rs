// Published change-set scenarios: what subscribers actually receive when a
// subject collection is mutated.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use ripple_collections::{
    ChangeSetKind, DistinctChangeSet, IndexedChangeSet, KeyedChangeSet, SubjectDictionary,
    SubjectList, SubjectSet,
};

fn record_set(set: &SubjectSet<i32>) -> (Rc<RefCell<Vec<DistinctChangeSet<i32>>>>, ripple_collections::Subscription) {
    let seen: Rc<RefCell<Vec<DistinctChangeSet<i32>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let sub = set.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));
    (seen, sub)
}

#[test]
fn distinct_additions_then_clear() {
    let set = SubjectSet::new();
    let (seen, _sub) = record_set(&set);

    // A duplicate add inside the batch is suppressed.
    set.union_with([1, 2, 1]);
    set.clear();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3); // snapshot + additions + clear

    assert_eq!(seen[1].kind(), ChangeSetKind::Update);
    let added: Vec<i32> = seen[1]
        .iter()
        .map(|c| *c.added_item().expect("addition"))
        .collect();
    assert_eq!(added, vec![1, 2]);

    assert_eq!(seen[2].kind(), ChangeSetKind::Clear);
    let removed: HashSet<i32> = seen[2]
        .iter()
        .map(|c| *c.removed_item().expect("removal"))
        .collect();
    assert_eq!(removed, HashSet::from([1, 2]));
}

#[test]
fn keyed_no_op_replace_publishes_nothing() {
    let map = SubjectDictionary::new();
    map.insert_or_replace("a", 1);

    let count = Rc::new(std::cell::Cell::new(0));
    let counter = count.clone();
    let _sub = map.subscribe_fn(move |_: &KeyedChangeSet<&str, i32>| {
        counter.set(counter.get() + 1)
    });
    assert_eq!(count.get(), 1); // snapshot

    assert!(!map.insert_or_replace("a", 1));
    assert_eq!(count.get(), 1);
}

#[test]
fn keyed_reset_publishes_one_reset_batch() {
    let map = SubjectDictionary::new();
    map.insert_or_replace_many([("a", 1), ("b", 2)]);

    let seen: Rc<RefCell<Vec<KeyedChangeSet<&str, i32>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = map.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));

    map.reset([("c", 3), ("d", 4)]);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2); // snapshot + reset
    let reset = &seen[1];
    assert_eq!(reset.kind(), ChangeSetKind::Reset);
    assert_eq!(reset.len(), 4);

    // Removal prefix covers the old entries, addition suffix the new ones.
    let removed: HashSet<(&str, i32)> = reset.changes()[..2]
        .iter()
        .map(|c| {
            let (k, v) = c.removed().expect("removal prefix");
            (*k, *v)
        })
        .collect();
    assert_eq!(removed, HashSet::from([("a", 1), ("b", 2)]));

    let added: HashSet<(&str, i32)> = reset.changes()[2..]
        .iter()
        .map(|c| {
            let (k, v) = c.added().expect("addition suffix");
            (*k, *v)
        })
        .collect();
    assert_eq!(added, HashSet::from([("c", 3), ("d", 4)]));
}

#[test]
fn list_range_removal_publishes_descending_indices() {
    let list = SubjectList::new();
    list.push_range([10, 20, 30, 40, 50]);

    let seen: Rc<RefCell<Vec<IndexedChangeSet<i32>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = list.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));

    list.remove_range(1, 3).unwrap();

    let seen = seen.borrow();
    let batch = &seen[1];
    assert_eq!(batch.kind(), ChangeSetKind::Update);
    assert_eq!(batch.changes()[0].removed(), Ok((3, &40)));
    assert_eq!(batch.changes()[1].removed(), Ok((2, &30)));
    assert_eq!(batch.changes()[2].removed(), Ok((1, &20)));
    assert_eq!(list.to_vec(), vec![10, 50]);
}

#[test]
fn mid_stream_subscriber_gets_snapshot_then_live_changes() {
    let map = SubjectDictionary::new();
    map.insert_or_replace("a", 1);
    map.insert_or_replace("b", 2);

    let seen: Rc<RefCell<Vec<KeyedChangeSet<&str, i32>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = map.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));

    {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind(), ChangeSetKind::Update);
        let snapshot: HashSet<(&str, i32)> = seen[0]
            .iter()
            .map(|c| {
                let (k, v) = c.added().expect("snapshot addition");
                (*k, *v)
            })
            .collect();
        assert_eq!(snapshot, HashSet::from([("a", 1), ("b", 2)]));
    }

    map.insert_or_replace("c", 3);
    map.remove(&"a");

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[1].changes()[0].added(), Ok((&"c", &3)));
    assert_eq!(seen[2].changes()[0].removed(), Ok((&"a", &1)));
}

#[test]
fn subscribers_see_batches_in_publication_order() {
    let list = SubjectList::new();

    let first: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let second: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));

    let sink = first.clone();
    let _a = list.subscribe_fn(move |changes: &IndexedChangeSet<i32>| {
        sink.borrow_mut().push(changes.len())
    });
    let sink = second.clone();
    let _b = list.subscribe_fn(move |changes: &IndexedChangeSet<i32>| {
        sink.borrow_mut().push(changes.len())
    });

    list.push_range([1, 2]);
    list.remove_at(0).unwrap();

    assert_eq!(*first.borrow(), vec![0, 2, 1]);
    assert_eq!(*second.borrow(), vec![0, 2, 1]);
}
