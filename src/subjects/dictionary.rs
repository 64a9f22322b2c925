// ============================================================================
// ripple-collections - SubjectDictionary
// A keyed map publishing change sets to subscribers
// ============================================================================

use std::hash::Hash;
use std::rc::Rc;

use crate::changes::KeyedChangeSet;
use crate::core::equality::EqualsFn;
use crate::core::error::CollectionError;
use crate::stream::{observer_fn, Observer, Subscription};
use crate::tracking::ChangeTrackingDictionary;

use super::core::SubjectCore;
use super::observe::observe_keyed_value;
use super::suspend::SuspensionGuard;

/// A [`ChangeTrackingDictionary`] wrapped with reactive streams, including
/// per-key value observation.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use ripple_collections::subjects::SubjectDictionary;
///
/// let map = SubjectDictionary::new();
/// map.insert_or_replace("a", 1);
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let _sub = map.observe_key_fn("a", move |v: &i32| sink.borrow_mut().push(*v));
///
/// map.insert_or_replace("a", 2);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct SubjectDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    core: Rc<SubjectCore<ChangeTrackingDictionary<K, V>>>,
}

impl<K, V> SubjectDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self::from_engine(ChangeTrackingDictionary::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_engine(ChangeTrackingDictionary::with_capacity(capacity))
    }
}

impl<K, V> SubjectDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Construct with a custom value-equality relation.
    pub fn with_equality(value_equals: EqualsFn<V>) -> Self {
        Self::from_engine(ChangeTrackingDictionary::with_equality(value_equals))
    }

    fn from_engine(engine: ChangeTrackingDictionary<K, V>) -> Self {
        Self {
            core: SubjectCore::new(engine),
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn len(&self) -> usize {
        self.core.collection().borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.core.collection().borrow().is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.core.collection().borrow().contains_key(key)
    }

    pub fn contains_pair(&self, key: &K, value: &V) -> bool {
        self.core.collection().borrow().contains_pair(key, value)
    }

    /// The value under `key`, cloned.
    pub fn value(&self, key: &K) -> Option<V> {
        self.core.collection().borrow().get(key).cloned()
    }

    /// Like [`value`](Self::value) but failing with
    /// [`CollectionError::KeyNotFound`].
    pub fn try_value(&self, key: &K) -> Result<V, CollectionError> {
        self.core.collection().borrow().try_get(key).cloned()
    }

    /// Snapshot of the current keys at time of retrieval.
    pub fn keys(&self) -> Vec<K> {
        self.core.collection().borrow().keys().cloned().collect()
    }

    /// Snapshot of the current values at time of retrieval.
    pub fn values(&self) -> Vec<V> {
        self.core.collection().borrow().values().cloned().collect()
    }

    /// Snapshot of the current entries at time of retrieval.
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.core.collection().borrow().to_vec()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub fn try_insert(&self, key: K, value: V) -> Result<(), CollectionError> {
        self.core.collection().borrow_mut().try_insert(key, value)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn insert_or_replace(&self, key: K, value: V) -> bool {
        let changed = self
            .core
            .collection()
            .borrow_mut()
            .insert_or_replace(key, value);
        self.core.publish_pending();
        changed
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        let removed = self.core.collection().borrow_mut().remove(key);
        self.core.publish_pending();
        removed
    }

    pub fn remove_pair(&self, key: &K, value: &V) -> bool {
        let changed = self.core.collection().borrow_mut().remove_pair(key, value);
        self.core.publish_pending();
        changed
    }

    pub fn try_insert_many<I>(&self, pairs: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        self.core.collection().borrow_mut().try_insert_many(pairs)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn insert_or_replace_many<I>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let changed = self
            .core
            .collection()
            .borrow_mut()
            .insert_or_replace_many(pairs);
        self.core.publish_pending();
        changed
    }

    pub fn remove_many<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let removed = self.core.collection().borrow_mut().remove_many(keys);
        self.core.publish_pending();
        removed
    }

    pub fn clear(&self) {
        self.core.collection().borrow_mut().clear();
        self.core.publish_pending();
    }

    pub fn reset<I>(&self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let changed = self.core.collection().borrow_mut().reset(pairs);
        self.core.publish_pending();
        changed
    }

    // =========================================================================
    // STREAMS
    // =========================================================================

    /// Snapshot-then-stream subscription to the change-set stream.
    pub fn subscribe(&self, observer: Rc<dyn Observer<KeyedChangeSet<K, V>>>) -> Subscription {
        self.core.subscribe(observer)
    }

    /// Closure convenience for [`subscribe`](Self::subscribe).
    pub fn subscribe_fn(&self, f: impl Fn(&KeyedChangeSet<K, V>) + 'static) -> Subscription {
        self.subscribe(observer_fn(f))
    }

    /// Valueless tick emitted before each published batch.
    pub fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        self.core.on_collection_changed(observer)
    }

    /// Stream of latest values under `key`; completes when the key
    /// disappears. See the module docs for the terminal-completion rule.
    pub fn observe_key(&self, key: K, observer: Rc<dyn Observer<V>>) -> Subscription {
        observe_keyed_value(
            &self.core,
            key,
            observer,
            Rc::new(|engine: &ChangeTrackingDictionary<K, V>, k: &K| engine.get(k).cloned()),
        )
    }

    /// Closure convenience for [`observe_key`](Self::observe_key).
    pub fn observe_key_fn(&self, key: K, f: impl Fn(&V) + 'static) -> Subscription {
        self.observe_key(key, observer_fn(f))
    }

    pub fn suspend_notifications(&self) -> SuspensionGuard {
        self.core.suspend()
    }

    pub fn dispose(&self) {
        self.core.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }

    /// True while the underlying collection is recording changes, which is
    /// exactly while the change stream has observers.
    pub fn is_change_collection_enabled(&self) -> bool {
        self.core.collection().borrow().is_change_collection_enabled()
    }
}

impl<K, V> Default for SubjectDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for SubjectDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChangeSetKind;
    use std::cell::RefCell;

    #[test]
    fn mutations_publish_batches() {
        let map = SubjectDictionary::new();
        let seen: Rc<RefCell<Vec<KeyedChangeSet<&str, i32>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = map.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));

        map.insert_or_replace("a", 1);
        map.insert_or_replace("a", 2);
        map.remove(&"a");

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4); // snapshot + 3 batches
        assert_eq!(seen[1].changes()[0].added(), Ok((&"a", &1)));
        assert_eq!(seen[2].changes()[0].replaced(), Ok((&"a", &1, &2)));
        assert_eq!(seen[3].kind(), ChangeSetKind::Clear);
    }

    #[test]
    fn no_op_replace_publishes_nothing() {
        let map = SubjectDictionary::new();
        map.insert_or_replace("a", 1);

        let count = Rc::new(std::cell::Cell::new(0));
        let counter = count.clone();
        let _sub = map.subscribe_fn(move |_| counter.set(counter.get() + 1));
        assert_eq!(count.get(), 1); // snapshot

        map.insert_or_replace("a", 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn failed_insert_publishes_nothing() {
        let map = SubjectDictionary::new();
        map.insert_or_replace("a", 1);

        let count = Rc::new(std::cell::Cell::new(0));
        let counter = count.clone();
        let _sub = map.subscribe_fn(move |_| counter.set(counter.get() + 1));

        assert_eq!(map.try_insert("a", 9), Err(CollectionError::DuplicateKey));
        assert_eq!(count.get(), 1);
        assert_eq!(map.value(&"a"), Some(1));
    }

    #[test]
    fn reset_publishes_single_reset_batch() {
        let map = SubjectDictionary::new();
        map.insert_or_replace_many([("a", 1), ("b", 2)]);

        let seen: Rc<RefCell<Vec<KeyedChangeSet<&str, i32>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = map.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));

        map.reset([("c", 3), ("d", 4)]);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].kind(), ChangeSetKind::Reset);
        assert_eq!(seen[1].len(), 4);
    }

    #[test]
    fn observe_key_emits_current_then_replacements() {
        let map = SubjectDictionary::new();
        map.insert_or_replace("a", 1);

        let seen: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
        let completed = Rc::new(std::cell::Cell::new(false));

        let sink = seen.clone();
        let flag = completed.clone();
        let _sub = map.observe_key(
            "a",
            crate::stream::observer_fn_completed(
                move |v: &i32| sink.borrow_mut().push(*v),
                move || flag.set(true),
            ),
        );

        assert_eq!(*seen.borrow(), vec![1]);

        map.insert_or_replace("a", 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        map.remove(&"a");
        assert!(completed.get());

        // Terminal: re-adding the key does not reopen the stream.
        map.insert_or_replace("a", 3);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn observe_key_of_absent_key_completes_immediately() {
        let map: SubjectDictionary<&str, i32> = SubjectDictionary::new();
        let completed = Rc::new(std::cell::Cell::new(false));

        let flag = completed.clone();
        let sub = map.observe_key(
            "missing",
            crate::stream::observer_fn_completed(|_: &i32| {}, move || flag.set(true)),
        );

        assert!(completed.get());
        assert!(!sub.is_active());
    }

    #[test]
    fn observe_key_completes_on_clear() {
        let map = SubjectDictionary::new();
        map.insert_or_replace("a", 1);

        let completed = Rc::new(std::cell::Cell::new(false));
        let flag = completed.clone();
        let _sub = map.observe_key(
            "a",
            crate::stream::observer_fn_completed(|_: &i32| {}, move || flag.set(true)),
        );

        map.clear();
        assert!(completed.get());
    }

    #[test]
    fn observe_key_survives_reset_when_key_remains() {
        let map = SubjectDictionary::new();
        map.insert_or_replace("a", 1);

        let seen: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = map.observe_key_fn("a", move |v: &i32| sink.borrow_mut().push(*v));

        map.reset([("a", 9), ("b", 2)]);
        assert_eq!(*seen.borrow(), vec![1, 9]);
    }

    #[test]
    fn gating_follows_observers() {
        let map: SubjectDictionary<&str, i32> = SubjectDictionary::new();
        let enabled = |m: &SubjectDictionary<&str, i32>| {
            m.core.collection().borrow().is_change_collection_enabled()
        };
        assert!(!enabled(&map));

        let sub = map.subscribe_fn(|_| {});
        assert!(enabled(&map));

        drop(sub);
        assert!(!enabled(&map));
    }
}
