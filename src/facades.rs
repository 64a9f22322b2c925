// ============================================================================
// ripple-collections - Facade Traits
// Polymorphism-only capability sets: readers, writers, observers
// ============================================================================
//
// Three flavours per collection shape. Readable traits expose the
// consumer-safe read surface; Extended traits add the mutable surface plus
// range and reset operations; Observable traits add the reactive
// capabilities. All traits are object-safe (range parameters are Vecs) and
// carry no state. `to_vec`-style views are snapshots at time of retrieval.
// ============================================================================

use std::hash::Hash;
use std::rc::Rc;

use crate::changes::{DistinctChangeSet, IndexedChangeSet, KeyedChangeSet};
use crate::core::error::CollectionError;
use crate::stream::{Observer, Subscription};
use crate::subjects::{SubjectCache, SubjectDictionary, SubjectList, SubjectSet};
use crate::tracking::{
    ChangeTrackingCache, ChangeTrackingDictionary, ChangeTrackingList, ChangeTrackingSet,
};

// =============================================================================
// READABLE
// =============================================================================

pub trait ReadableSet<T> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn contains(&self, item: &T) -> bool;
    fn to_vec(&self) -> Vec<T>;
}

pub trait ReadableMap<K, V> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn contains_key(&self, key: &K) -> bool;
    fn value(&self, key: &K) -> Option<V>;
    fn keys(&self) -> Vec<K>;
    fn to_vec(&self) -> Vec<(K, V)>;
}

pub trait ReadableList<T> {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn item_at(&self, index: usize) -> Option<T>;
    fn index_of(&self, item: &T) -> Option<usize>;
    fn to_vec(&self) -> Vec<T>;
}

// =============================================================================
// EXTENDED (mutable + range/reset)
// =============================================================================

pub trait ExtendedSet<T>: ReadableSet<T> {
    fn insert(&mut self, item: T) -> bool;
    fn remove(&mut self, item: &T) -> bool;
    fn clear(&mut self);
    fn union_with(&mut self, items: Vec<T>) -> bool;
    fn except_with(&mut self, items: Vec<T>) -> bool;
    fn intersect_with(&mut self, items: Vec<T>) -> bool;
    fn symmetric_except_with(&mut self, items: Vec<T>) -> bool;
    fn reset(&mut self, items: Vec<T>) -> bool;
}

pub trait ExtendedMap<K, V>: ReadableMap<K, V> {
    fn try_insert(&mut self, key: K, value: V) -> Result<(), CollectionError>;
    fn insert_or_replace(&mut self, key: K, value: V) -> bool;
    fn remove(&mut self, key: &K) -> Option<V>;
    fn remove_pair(&mut self, key: &K, value: &V) -> bool;
    fn try_insert_many(&mut self, pairs: Vec<(K, V)>) -> Result<(), CollectionError>;
    fn insert_or_replace_many(&mut self, pairs: Vec<(K, V)>) -> bool;
    fn remove_many(&mut self, keys: Vec<K>) -> usize;
    fn clear(&mut self);
    fn reset(&mut self, pairs: Vec<(K, V)>) -> bool;
}

pub trait ExtendedCache<K, V>: ReadableMap<K, V> {
    fn try_insert(&mut self, item: V) -> Result<(), CollectionError>;
    fn insert_or_update(&mut self, item: V) -> bool;
    fn insert_or_update_many(&mut self, items: Vec<V>) -> bool;
    fn remove_key(&mut self, key: &K) -> Option<V>;
    fn remove(&mut self, item: &V) -> bool;
    fn clear(&mut self);
    fn reset(&mut self, items: Vec<V>) -> bool;
}

pub trait ExtendedList<T>: ReadableList<T> {
    fn push(&mut self, item: T);
    fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError>;
    fn push_range(&mut self, items: Vec<T>);
    fn insert_range(&mut self, index: usize, items: Vec<T>) -> Result<(), CollectionError>;
    fn remove_at(&mut self, index: usize) -> Result<T, CollectionError>;
    fn remove(&mut self, item: &T) -> bool;
    fn remove_range(&mut self, index: usize, count: usize) -> Result<(), CollectionError>;
    fn set(&mut self, index: usize, item: T) -> Result<(), CollectionError>;
    fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<(), CollectionError>;
    fn clear(&mut self);
    fn reset(&mut self, items: Vec<T>) -> bool;
}

// =============================================================================
// OBSERVABLE
// =============================================================================

pub trait ObservableSet<T>: ReadableSet<T> {
    fn subscribe(&self, observer: Rc<dyn Observer<DistinctChangeSet<T>>>) -> Subscription;
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription;
}

pub trait ObservableMap<K, V>: ReadableMap<K, V> {
    fn subscribe(&self, observer: Rc<dyn Observer<KeyedChangeSet<K, V>>>) -> Subscription;
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription;
    fn observe_key(&self, key: K, observer: Rc<dyn Observer<V>>) -> Subscription;
}

pub trait ObservableList<T>: ReadableList<T> {
    fn subscribe(&self, observer: Rc<dyn Observer<IndexedChangeSet<T>>>) -> Subscription;
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription;
    fn observe_index(&self, index: usize, observer: Rc<dyn Observer<T>>) -> Subscription;
}

// =============================================================================
// ENGINE IMPLEMENTATIONS
// =============================================================================

impl<T: Eq + Hash + Clone> ReadableSet<T> for ChangeTrackingSet<T> {
    fn len(&self) -> usize {
        ChangeTrackingSet::len(self)
    }
    fn contains(&self, item: &T) -> bool {
        ChangeTrackingSet::contains(self, item)
    }
    fn to_vec(&self) -> Vec<T> {
        ChangeTrackingSet::to_vec(self)
    }
}

impl<T: Eq + Hash + Clone> ExtendedSet<T> for ChangeTrackingSet<T> {
    fn insert(&mut self, item: T) -> bool {
        ChangeTrackingSet::insert(self, item)
    }
    fn remove(&mut self, item: &T) -> bool {
        ChangeTrackingSet::remove(self, item)
    }
    fn clear(&mut self) {
        ChangeTrackingSet::clear(self)
    }
    fn union_with(&mut self, items: Vec<T>) -> bool {
        ChangeTrackingSet::union_with(self, items)
    }
    fn except_with(&mut self, items: Vec<T>) -> bool {
        ChangeTrackingSet::except_with(self, items.iter())
    }
    fn intersect_with(&mut self, items: Vec<T>) -> bool {
        ChangeTrackingSet::intersect_with(self, items)
    }
    fn symmetric_except_with(&mut self, items: Vec<T>) -> bool {
        ChangeTrackingSet::symmetric_except_with(self, items)
    }
    fn reset(&mut self, items: Vec<T>) -> bool {
        ChangeTrackingSet::reset(self, items)
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ReadableMap<K, V> for ChangeTrackingDictionary<K, V> {
    fn len(&self) -> usize {
        ChangeTrackingDictionary::len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        ChangeTrackingDictionary::contains_key(self, key)
    }
    fn value(&self, key: &K) -> Option<V> {
        ChangeTrackingDictionary::get(self, key).cloned()
    }
    fn keys(&self) -> Vec<K> {
        ChangeTrackingDictionary::keys(self).cloned().collect()
    }
    fn to_vec(&self) -> Vec<(K, V)> {
        ChangeTrackingDictionary::to_vec(self)
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ExtendedMap<K, V> for ChangeTrackingDictionary<K, V> {
    fn try_insert(&mut self, key: K, value: V) -> Result<(), CollectionError> {
        ChangeTrackingDictionary::try_insert(self, key, value)
    }
    fn insert_or_replace(&mut self, key: K, value: V) -> bool {
        ChangeTrackingDictionary::insert_or_replace(self, key, value)
    }
    fn remove(&mut self, key: &K) -> Option<V> {
        ChangeTrackingDictionary::remove(self, key)
    }
    fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        ChangeTrackingDictionary::remove_pair(self, key, value)
    }
    fn try_insert_many(&mut self, pairs: Vec<(K, V)>) -> Result<(), CollectionError> {
        ChangeTrackingDictionary::try_insert_many(self, pairs)
    }
    fn insert_or_replace_many(&mut self, pairs: Vec<(K, V)>) -> bool {
        ChangeTrackingDictionary::insert_or_replace_many(self, pairs)
    }
    fn remove_many(&mut self, keys: Vec<K>) -> usize {
        ChangeTrackingDictionary::remove_many(self, keys.iter())
    }
    fn clear(&mut self) {
        ChangeTrackingDictionary::clear(self)
    }
    fn reset(&mut self, pairs: Vec<(K, V)>) -> bool {
        ChangeTrackingDictionary::reset(self, pairs)
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ReadableMap<K, V> for ChangeTrackingCache<K, V> {
    fn len(&self) -> usize {
        ChangeTrackingCache::len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        ChangeTrackingCache::contains_key(self, key)
    }
    fn value(&self, key: &K) -> Option<V> {
        ChangeTrackingCache::get(self, key).cloned()
    }
    fn keys(&self) -> Vec<K> {
        ChangeTrackingCache::keys(self).cloned().collect()
    }
    fn to_vec(&self) -> Vec<(K, V)> {
        ChangeTrackingCache::to_vec(self)
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ExtendedCache<K, V> for ChangeTrackingCache<K, V> {
    fn try_insert(&mut self, item: V) -> Result<(), CollectionError> {
        ChangeTrackingCache::try_insert(self, item)
    }
    fn insert_or_update(&mut self, item: V) -> bool {
        ChangeTrackingCache::insert_or_update(self, item)
    }
    fn insert_or_update_many(&mut self, items: Vec<V>) -> bool {
        ChangeTrackingCache::insert_or_update_many(self, items)
    }
    fn remove_key(&mut self, key: &K) -> Option<V> {
        ChangeTrackingCache::remove_key(self, key)
    }
    fn remove(&mut self, item: &V) -> bool {
        ChangeTrackingCache::remove(self, item)
    }
    fn clear(&mut self) {
        ChangeTrackingCache::clear(self)
    }
    fn reset(&mut self, items: Vec<V>) -> bool {
        ChangeTrackingCache::reset(self, items)
    }
}

impl<T: Clone> ReadableList<T> for ChangeTrackingList<T> {
    fn len(&self) -> usize {
        ChangeTrackingList::len(self)
    }
    fn item_at(&self, index: usize) -> Option<T> {
        ChangeTrackingList::get(self, index).cloned()
    }
    fn index_of(&self, item: &T) -> Option<usize> {
        ChangeTrackingList::index_of(self, item)
    }
    fn to_vec(&self) -> Vec<T> {
        ChangeTrackingList::to_vec(self)
    }
}

impl<T: Clone> ExtendedList<T> for ChangeTrackingList<T> {
    fn push(&mut self, item: T) {
        ChangeTrackingList::push(self, item)
    }
    fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        ChangeTrackingList::insert(self, index, item)
    }
    fn push_range(&mut self, items: Vec<T>) {
        ChangeTrackingList::push_range(self, items)
    }
    fn insert_range(&mut self, index: usize, items: Vec<T>) -> Result<(), CollectionError> {
        ChangeTrackingList::insert_range(self, index, items)
    }
    fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        ChangeTrackingList::remove_at(self, index)
    }
    fn remove(&mut self, item: &T) -> bool {
        ChangeTrackingList::remove(self, item)
    }
    fn remove_range(&mut self, index: usize, count: usize) -> Result<(), CollectionError> {
        ChangeTrackingList::remove_range(self, index, count)
    }
    fn set(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        ChangeTrackingList::set(self, index, item)
    }
    fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<(), CollectionError> {
        ChangeTrackingList::move_item(self, old_index, new_index)
    }
    fn clear(&mut self) {
        ChangeTrackingList::clear(self)
    }
    fn reset(&mut self, items: Vec<T>) -> bool {
        ChangeTrackingList::reset(self, items)
    }
}

// =============================================================================
// SUBJECT IMPLEMENTATIONS
// =============================================================================

impl<T: Eq + Hash + Clone + 'static> ReadableSet<T> for SubjectSet<T> {
    fn len(&self) -> usize {
        SubjectSet::len(self)
    }
    fn contains(&self, item: &T) -> bool {
        SubjectSet::contains(self, item)
    }
    fn to_vec(&self) -> Vec<T> {
        SubjectSet::to_vec(self)
    }
}

impl<T: Eq + Hash + Clone + 'static> ExtendedSet<T> for SubjectSet<T> {
    fn insert(&mut self, item: T) -> bool {
        SubjectSet::insert(self, item)
    }
    fn remove(&mut self, item: &T) -> bool {
        SubjectSet::remove(self, item)
    }
    fn clear(&mut self) {
        SubjectSet::clear(self)
    }
    fn union_with(&mut self, items: Vec<T>) -> bool {
        SubjectSet::union_with(self, items)
    }
    fn except_with(&mut self, items: Vec<T>) -> bool {
        SubjectSet::except_with(self, items.iter())
    }
    fn intersect_with(&mut self, items: Vec<T>) -> bool {
        SubjectSet::intersect_with(self, items)
    }
    fn symmetric_except_with(&mut self, items: Vec<T>) -> bool {
        SubjectSet::symmetric_except_with(self, items)
    }
    fn reset(&mut self, items: Vec<T>) -> bool {
        SubjectSet::reset(self, items)
    }
}

impl<T: Eq + Hash + Clone + 'static> ObservableSet<T> for SubjectSet<T> {
    fn subscribe(&self, observer: Rc<dyn Observer<DistinctChangeSet<T>>>) -> Subscription {
        SubjectSet::subscribe(self, observer)
    }
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        SubjectSet::on_collection_changed(self, observer)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> ReadableMap<K, V>
    for SubjectDictionary<K, V>
{
    fn len(&self) -> usize {
        SubjectDictionary::len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        SubjectDictionary::contains_key(self, key)
    }
    fn value(&self, key: &K) -> Option<V> {
        SubjectDictionary::value(self, key)
    }
    fn keys(&self) -> Vec<K> {
        SubjectDictionary::keys(self)
    }
    fn to_vec(&self) -> Vec<(K, V)> {
        SubjectDictionary::to_vec(self)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> ExtendedMap<K, V>
    for SubjectDictionary<K, V>
{
    fn try_insert(&mut self, key: K, value: V) -> Result<(), CollectionError> {
        SubjectDictionary::try_insert(self, key, value)
    }
    fn insert_or_replace(&mut self, key: K, value: V) -> bool {
        SubjectDictionary::insert_or_replace(self, key, value)
    }
    fn remove(&mut self, key: &K) -> Option<V> {
        SubjectDictionary::remove(self, key)
    }
    fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        SubjectDictionary::remove_pair(self, key, value)
    }
    fn try_insert_many(&mut self, pairs: Vec<(K, V)>) -> Result<(), CollectionError> {
        SubjectDictionary::try_insert_many(self, pairs)
    }
    fn insert_or_replace_many(&mut self, pairs: Vec<(K, V)>) -> bool {
        SubjectDictionary::insert_or_replace_many(self, pairs)
    }
    fn remove_many(&mut self, keys: Vec<K>) -> usize {
        SubjectDictionary::remove_many(self, keys.iter())
    }
    fn clear(&mut self) {
        SubjectDictionary::clear(self)
    }
    fn reset(&mut self, pairs: Vec<(K, V)>) -> bool {
        SubjectDictionary::reset(self, pairs)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> ObservableMap<K, V>
    for SubjectDictionary<K, V>
{
    fn subscribe(&self, observer: Rc<dyn Observer<KeyedChangeSet<K, V>>>) -> Subscription {
        SubjectDictionary::subscribe(self, observer)
    }
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        SubjectDictionary::on_collection_changed(self, observer)
    }
    fn observe_key(&self, key: K, observer: Rc<dyn Observer<V>>) -> Subscription {
        SubjectDictionary::observe_key(self, key, observer)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> ReadableMap<K, V> for SubjectCache<K, V> {
    fn len(&self) -> usize {
        SubjectCache::len(self)
    }
    fn contains_key(&self, key: &K) -> bool {
        SubjectCache::contains_key(self, key)
    }
    fn value(&self, key: &K) -> Option<V> {
        SubjectCache::item(self, key)
    }
    fn keys(&self) -> Vec<K> {
        SubjectCache::keys(self)
    }
    fn to_vec(&self) -> Vec<(K, V)> {
        SubjectCache::to_vec(self)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> ExtendedCache<K, V>
    for SubjectCache<K, V>
{
    fn try_insert(&mut self, item: V) -> Result<(), CollectionError> {
        SubjectCache::try_insert(self, item)
    }
    fn insert_or_update(&mut self, item: V) -> bool {
        SubjectCache::insert_or_update(self, item)
    }
    fn insert_or_update_many(&mut self, items: Vec<V>) -> bool {
        SubjectCache::insert_or_update_many(self, items)
    }
    fn remove_key(&mut self, key: &K) -> Option<V> {
        SubjectCache::remove_key(self, key)
    }
    fn remove(&mut self, item: &V) -> bool {
        SubjectCache::remove(self, item)
    }
    fn clear(&mut self) {
        SubjectCache::clear(self)
    }
    fn reset(&mut self, items: Vec<V>) -> bool {
        SubjectCache::reset(self, items)
    }
}

impl<K: Eq + Hash + Clone + 'static, V: Clone + 'static> ObservableMap<K, V>
    for SubjectCache<K, V>
{
    fn subscribe(&self, observer: Rc<dyn Observer<KeyedChangeSet<K, V>>>) -> Subscription {
        SubjectCache::subscribe(self, observer)
    }
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        SubjectCache::on_collection_changed(self, observer)
    }
    fn observe_key(&self, key: K, observer: Rc<dyn Observer<V>>) -> Subscription {
        SubjectCache::observe_key(self, key, observer)
    }
}

impl<T: Clone + 'static> ReadableList<T> for SubjectList<T> {
    fn len(&self) -> usize {
        SubjectList::len(self)
    }
    fn item_at(&self, index: usize) -> Option<T> {
        SubjectList::item_at(self, index)
    }
    fn index_of(&self, item: &T) -> Option<usize> {
        SubjectList::index_of(self, item)
    }
    fn to_vec(&self) -> Vec<T> {
        SubjectList::to_vec(self)
    }
}

impl<T: Clone + 'static> ExtendedList<T> for SubjectList<T> {
    fn push(&mut self, item: T) {
        SubjectList::push(self, item)
    }
    fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        SubjectList::insert(self, index, item)
    }
    fn push_range(&mut self, items: Vec<T>) {
        SubjectList::push_range(self, items)
    }
    fn insert_range(&mut self, index: usize, items: Vec<T>) -> Result<(), CollectionError> {
        SubjectList::insert_range(self, index, items)
    }
    fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        SubjectList::remove_at(self, index)
    }
    fn remove(&mut self, item: &T) -> bool {
        SubjectList::remove(self, item)
    }
    fn remove_range(&mut self, index: usize, count: usize) -> Result<(), CollectionError> {
        SubjectList::remove_range(self, index, count)
    }
    fn set(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        SubjectList::set(self, index, item)
    }
    fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<(), CollectionError> {
        SubjectList::move_item(self, old_index, new_index)
    }
    fn clear(&mut self) {
        SubjectList::clear(self)
    }
    fn reset(&mut self, items: Vec<T>) -> bool {
        SubjectList::reset(self, items)
    }
}

impl<T: Clone + 'static> ObservableList<T> for SubjectList<T> {
    fn subscribe(&self, observer: Rc<dyn Observer<IndexedChangeSet<T>>>) -> Subscription {
        SubjectList::subscribe(self, observer)
    }
    fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        SubjectList::on_collection_changed(self, observer)
    }
    fn observe_index(&self, index: usize, observer: Rc<dyn Observer<T>>) -> Subscription {
        SubjectList::observe_index(self, index, observer)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engines_work_through_extended_traits() {
        let mut list: Box<dyn ExtendedList<i32>> = Box::new(ChangeTrackingList::new());
        list.push_range(vec![1, 2, 3]);
        list.set(0, 9).unwrap();
        assert_eq!(list.to_vec(), vec![9, 2, 3]);
        assert_eq!(list.item_at(1), Some(2));

        let mut map: Box<dyn ExtendedMap<&str, i32>> = Box::new(ChangeTrackingDictionary::new());
        map.insert_or_replace("a", 1);
        assert_eq!(map.value(&"a"), Some(1));
        assert!(map.reset(vec![("b", 2)]));
        assert_eq!(map.keys(), vec!["b"]);
    }

    #[test]
    fn readers_are_statically_distinguishable_from_writers() {
        fn count<T>(readable: &dyn ReadableSet<T>) -> usize {
            readable.len()
        }

        let mut set = ChangeTrackingSet::new();
        ExtendedSet::insert(&mut set, 1);
        assert_eq!(count(&set), 1);
    }

    #[test]
    fn subjects_work_through_observable_traits() {
        use std::cell::Cell;

        let list = SubjectList::new();
        list.push_range([1, 2]);

        let observable: &dyn ObservableList<i32> = &list;
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        let _sub = observable.on_collection_changed(crate::stream::observer_fn(move |_: &()| {
            counter.set(counter.get() + 1);
        }));

        list.push(3);
        assert_eq!(ticks.get(), 1);
        assert_eq!(observable.item_at(2), Some(3));
    }

    #[test]
    fn cache_facade_exposes_item_surface() {
        #[derive(Clone, PartialEq)]
        struct Row {
            id: u32,
            text: &'static str,
        }

        let mut cache: Box<dyn ExtendedCache<u32, Row>> =
            Box::new(ChangeTrackingCache::new(|r: &Row| r.id));
        assert!(cache.insert_or_update(Row { id: 1, text: "a" }));
        assert!(cache.contains_key(&1));
        assert_eq!(cache.remove_key(&1).map(|r| r.text), Some("a"));
    }
}
