// ============================================================================
// ripple-collections - SubjectCache
// A key-selector cache publishing change sets to subscribers
// ============================================================================

use std::hash::Hash;
use std::rc::Rc;

use crate::changes::KeyedChangeSet;
use crate::core::equality::EqualsFn;
use crate::core::error::CollectionError;
use crate::stream::{observer_fn, Observer, Subscription};
use crate::tracking::ChangeTrackingCache;

use super::core::SubjectCore;
use super::observe::observe_keyed_value;
use super::suspend::SuspensionGuard;

/// A [`ChangeTrackingCache`] wrapped with reactive streams. Keys are
/// derived from items via the cache's selector; the stream contract is the
/// same as [`SubjectDictionary`](super::SubjectDictionary).
///
/// # Example
///
/// ```
/// use ripple_collections::subjects::SubjectCache;
///
/// #[derive(Clone, PartialEq)]
/// struct User { id: u32, name: String }
///
/// let cache = SubjectCache::new(|u: &User| u.id);
/// cache.insert_or_update(User { id: 1, name: "ada".into() });
/// assert!(cache.contains_key(&1));
/// ```
pub struct SubjectCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    core: Rc<SubjectCore<ChangeTrackingCache<K, V>>>,
}

impl<K, V> SubjectCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + PartialEq + 'static,
{
    pub fn new(key_selector: impl Fn(&V) -> K + 'static) -> Self {
        Self::from_engine(ChangeTrackingCache::new(key_selector))
    }

    pub fn with_capacity(capacity: usize, key_selector: impl Fn(&V) -> K + 'static) -> Self {
        Self::from_engine(ChangeTrackingCache::with_capacity(capacity, key_selector))
    }
}

impl<K, V> SubjectCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    /// Construct with a custom item-equality relation.
    pub fn with_equality(
        key_selector: impl Fn(&V) -> K + 'static,
        item_equals: EqualsFn<V>,
    ) -> Self {
        Self::from_engine(ChangeTrackingCache::with_equality(key_selector, item_equals))
    }

    fn from_engine(engine: ChangeTrackingCache<K, V>) -> Self {
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

    pub fn contains_item(&self, item: &V) -> bool {
        self.core.collection().borrow().contains_item(item)
    }

    /// The item under `key`, cloned.
    pub fn item(&self, key: &K) -> Option<V> {
        self.core.collection().borrow().get(key).cloned()
    }

    /// Like [`item`](Self::item) but failing with
    /// [`CollectionError::KeyNotFound`].
    pub fn try_item(&self, key: &K) -> Result<V, CollectionError> {
        self.core.collection().borrow().try_get(key).cloned()
    }

    /// Snapshot of the current keys at time of retrieval.
    pub fn keys(&self) -> Vec<K> {
        self.core.collection().borrow().keys().cloned().collect()
    }

    /// Snapshot of the current items at time of retrieval.
    pub fn items(&self) -> Vec<V> {
        self.core.collection().borrow().values().cloned().collect()
    }

    /// Snapshot of the current entries at time of retrieval.
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.core.collection().borrow().to_vec()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub fn try_insert(&self, item: V) -> Result<(), CollectionError> {
        self.core.collection().borrow_mut().try_insert(item)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn insert_or_update(&self, item: V) -> bool {
        let changed = self.core.collection().borrow_mut().insert_or_update(item);
        self.core.publish_pending();
        changed
    }

    pub fn insert_or_update_many<I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let changed = self
            .core
            .collection()
            .borrow_mut()
            .insert_or_update_many(items);
        self.core.publish_pending();
        changed
    }

    pub fn remove_key(&self, key: &K) -> Option<V> {
        let removed = self.core.collection().borrow_mut().remove_key(key);
        self.core.publish_pending();
        removed
    }

    pub fn remove(&self, item: &V) -> bool {
        let changed = self.core.collection().borrow_mut().remove(item);
        self.core.publish_pending();
        changed
    }

    pub fn remove_keys<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let removed = self.core.collection().borrow_mut().remove_keys(keys);
        self.core.publish_pending();
        removed
    }

    pub fn clear(&self) {
        self.core.collection().borrow_mut().clear();
        self.core.publish_pending();
    }

    pub fn reset<I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let changed = self.core.collection().borrow_mut().reset(items);
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

    /// Stream of latest items under `key`; completes when the key
    /// disappears. Completion is terminal.
    pub fn observe_key(&self, key: K, observer: Rc<dyn Observer<V>>) -> Subscription {
        observe_keyed_value(
            &self.core,
            key,
            observer,
            Rc::new(|engine: &ChangeTrackingCache<K, V>, k: &K| engine.get(k).cloned()),
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

impl<K, V> Clone for SubjectCache<K, V>
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

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    fn item(id: u32, label: &'static str) -> Item {
        Item { id, label }
    }

    fn cache() -> SubjectCache<u32, Item> {
        SubjectCache::new(|i: &Item| i.id)
    }

    #[test]
    fn updates_publish_batches() {
        let cache = cache();
        let seen: Rc<RefCell<Vec<KeyedChangeSet<u32, Item>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = cache.subscribe_fn(move |changes| sink.borrow_mut().push(changes.clone()));

        cache.insert_or_update(item(1, "a"));
        cache.insert_or_update(item(1, "b"));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3); // snapshot + 2 batches
        assert!(seen[1].changes()[0].is_addition());
        assert!(seen[2].changes()[0].is_replacement());
    }

    #[test]
    fn observe_key_follows_item_lifetime() {
        let cache = cache();
        cache.insert_or_update(item(1, "a"));

        let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let completed = Rc::new(std::cell::Cell::new(false));

        let sink = seen.clone();
        let flag = completed.clone();
        let _sub = cache.observe_key(
            1,
            crate::stream::observer_fn_completed(
                move |v: &Item| sink.borrow_mut().push(v.label),
                move || flag.set(true),
            ),
        );

        cache.insert_or_update(item(1, "b"));
        cache.remove_key(&1);

        assert_eq!(*seen.borrow(), vec!["a", "b"]);
        assert!(completed.get());
    }

    #[test]
    fn reset_publishes_reset_batch() {
        let cache = cache();
        cache.insert_or_update_many([item(1, "a"), item(2, "b")]);

        let seen: Rc<RefCell<Vec<ChangeSetKind>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = cache.subscribe_fn(move |changes| sink.borrow_mut().push(changes.kind()));

        cache.reset([item(3, "c")]);
        assert_eq!(*seen.borrow(), vec![ChangeSetKind::Update, ChangeSetKind::Reset]);
        assert_eq!(cache.keys(), vec![3]);
    }

    #[test]
    fn remove_is_item_gated() {
        let cache = cache();
        cache.insert_or_update(item(1, "a"));

        assert!(!cache.remove(&item(1, "other")));
        assert!(cache.remove(&item(1, "a")));
        assert!(cache.is_empty());
    }
}
