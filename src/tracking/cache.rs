// ============================================================================
// ripple-collections - ChangeTrackingCache
// A keyed collection deriving keys from items via a selector
// ============================================================================

use std::hash::Hash;

use crate::changes::KeyedChangeSet;
use crate::core::equality::{default_equals, EqualsFn};
use crate::core::error::CollectionError;

use super::{ChangeTracking, ChangeTrackingDictionary};

/// A keyed collection whose keys are derived from the items themselves.
///
/// Behaviourally identical to [`ChangeTrackingDictionary`] once the key is
/// obtained; the cache stores the items plus an owned key-selector and
/// computes the key on every write.
///
/// # Example
///
/// ```
/// use ripple_collections::tracking::ChangeTrackingCache;
///
/// #[derive(Clone, PartialEq)]
/// struct User { id: u32, name: String }
///
/// let mut cache = ChangeTrackingCache::new(|u: &User| u.id);
/// cache.insert_or_update(User { id: 1, name: "ada".into() });
/// assert!(cache.contains_key(&1));
/// ```
pub struct ChangeTrackingCache<K, V> {
    entries: ChangeTrackingDictionary<K, V>,
    key_of: Box<dyn Fn(&V) -> K>,
}

impl<K, V> ChangeTrackingCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    pub fn new(key_selector: impl Fn(&V) -> K + 'static) -> Self {
        Self {
            entries: ChangeTrackingDictionary::with_equality(default_equals),
            key_of: Box::new(key_selector),
        }
    }

    pub fn with_capacity(capacity: usize, key_selector: impl Fn(&V) -> K + 'static) -> Self {
        Self {
            entries: ChangeTrackingDictionary::with_capacity_and_equality(
                capacity,
                default_equals,
            ),
            key_of: Box::new(key_selector),
        }
    }
}

impl<K, V> ChangeTrackingCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Construct with a custom item-equality relation.
    pub fn with_equality(
        key_selector: impl Fn(&V) -> K + 'static,
        item_equals: EqualsFn<V>,
    ) -> Self {
        Self {
            entries: ChangeTrackingDictionary::with_equality(item_equals),
            key_of: Box::new(key_selector),
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// True iff an item with the same derived key is stored and equals
    /// `item` under the injected relation.
    pub fn contains_item(&self, item: &V) -> bool {
        self.entries.contains_pair(&(self.key_of)(item), item)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn try_get(&self, key: &K) -> Result<&V, CollectionError> {
        self.entries.try_get(key)
    }

    /// The key the selector derives for `item`.
    pub fn key_of(&self, item: &V) -> K {
        (self.key_of)(item)
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> std::collections::hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> std::collections::hash_map::Values<'_, K, V> {
        self.entries.values()
    }

    /// Snapshot of the current entries, in iteration order.
    pub fn to_vec(&self) -> Vec<(K, V)> {
        self.entries.to_vec()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Insert a new item, failing with [`CollectionError::DuplicateKey`]
    /// (state unchanged) if its derived key is already present.
    pub fn try_insert(&mut self, item: V) -> Result<(), CollectionError> {
        let key = (self.key_of)(&item);
        self.entries.try_insert(key, item)
    }

    /// Insert or update under the item's derived key; equal items are
    /// suppressed as no-ops. Returns true iff storage changed.
    pub fn insert_or_update(&mut self, item: V) -> bool {
        let key = (self.key_of)(&item);
        self.entries.insert_or_replace(key, item)
    }

    /// Apply [`insert_or_update`](Self::insert_or_update) per item.
    /// Returns true iff the cache changed.
    pub fn insert_or_update_many<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let mut changed = false;
        for item in items {
            changed |= self.insert_or_update(item);
        }
        changed
    }

    /// Delete the entry under `key`, returning its item.
    pub fn remove_key(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    /// Delete the entry whose derived key matches `item`, only if the
    /// stored item equals `item` under the injected relation.
    /// Returns true iff the cache changed.
    pub fn remove(&mut self, item: &V) -> bool {
        self.entries.remove_pair(&(self.key_of)(item), item)
    }

    /// Delete each present key; absent keys are ignored. Returns the number
    /// of entries removed.
    pub fn remove_keys<'a, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        self.entries.remove_many(keys)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the entire contents: clear, then insert-or-update `items`.
    /// Returns true iff the cache changed.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = V>,
    {
        let was_non_empty = !self.entries.is_empty();
        self.entries.clear();
        let added = self.insert_or_update_many(items);
        was_non_empty || added
    }

    // =========================================================================
    // CAPTURE
    // =========================================================================

    pub fn is_dirty(&self) -> bool {
        self.entries.is_dirty()
    }

    pub fn is_change_collection_enabled(&self) -> bool {
        self.entries.is_change_collection_enabled()
    }

    pub fn set_change_collection(&mut self, enabled: bool) {
        self.entries.set_change_collection(enabled);
    }

    /// Emit the buffered change set (empty while collection is disabled)
    /// and clear the dirty flag.
    pub fn capture_changes_and_clean(&mut self) -> KeyedChangeSet<K, V> {
        self.entries.capture_changes_and_clean()
    }

    pub fn snapshot_changes(&self) -> KeyedChangeSet<K, V> {
        self.entries.snapshot_changes()
    }
}

impl<K, V> ChangeTracking for ChangeTrackingCache<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    type Changes = KeyedChangeSet<K, V>;

    fn is_dirty(&self) -> bool {
        ChangeTrackingCache::is_dirty(self)
    }

    fn is_change_collection_enabled(&self) -> bool {
        ChangeTrackingCache::is_change_collection_enabled(self)
    }

    fn set_change_collection(&mut self, enabled: bool) {
        ChangeTrackingCache::set_change_collection(self, enabled)
    }

    fn capture_changes_and_clean(&mut self) -> KeyedChangeSet<K, V> {
        ChangeTrackingCache::capture_changes_and_clean(self)
    }

    fn snapshot_changes(&self) -> KeyedChangeSet<K, V> {
        ChangeTrackingCache::snapshot_changes(self)
    }
}

impl<K, V> std::fmt::Debug for ChangeTrackingCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTrackingCache")
            .field("entries", &self.entries)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChangeSetKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    fn item(id: u32, label: &'static str) -> Item {
        Item { id, label }
    }

    fn cache() -> ChangeTrackingCache<u32, Item> {
        ChangeTrackingCache::new(|i: &Item| i.id)
    }

    #[test]
    fn keys_are_derived_from_items() {
        let mut cache = cache();
        cache.insert_or_update(item(1, "a"));
        cache.insert_or_update(item(2, "b"));

        assert_eq!(cache.key_of(&item(7, "x")), 7);
        assert!(cache.contains_key(&1));
        assert_eq!(cache.get(&2), Some(&item(2, "b")));
    }

    #[test]
    fn try_insert_rejects_duplicate_derived_key() {
        let mut cache = cache();
        assert!(cache.try_insert(item(1, "a")).is_ok());
        assert_eq!(
            cache.try_insert(item(1, "b")),
            Err(CollectionError::DuplicateKey)
        );
        assert_eq!(cache.get(&1), Some(&item(1, "a")));
    }

    #[test]
    fn update_records_replacement_and_suppresses_no_ops() {
        let mut cache = cache();
        cache.insert_or_update(item(1, "a"));
        let _ = cache.capture_changes_and_clean();

        assert!(!cache.insert_or_update(item(1, "a")));
        assert!(!cache.is_dirty());

        assert!(cache.insert_or_update(item(1, "b")));
        let changes = cache.capture_changes_and_clean();
        assert_eq!(changes.len(), 1);
        let (key, old, new) = changes.changes()[0].replaced().expect("replacement");
        assert_eq!(*key, 1);
        assert_eq!(old.label, "a");
        assert_eq!(new.label, "b");
    }

    #[test]
    fn remove_is_item_equality_gated() {
        let mut cache = cache();
        cache.insert_or_update(item(1, "a"));
        let _ = cache.capture_changes_and_clean();

        // Same key, different item: not removed.
        assert!(!cache.remove(&item(1, "b")));
        assert!(cache.contains_key(&1));

        assert!(cache.remove(&item(1, "a")));
        assert!(cache.is_empty());
    }

    #[test]
    fn remove_key_returns_item() {
        let mut cache = cache();
        cache.insert_or_update(item(1, "a"));
        assert_eq!(cache.remove_key(&1), Some(item(1, "a")));
        assert_eq!(cache.remove_key(&1), None);
    }

    #[test]
    fn reset_classifies_as_reset() {
        let mut cache = cache();
        cache.insert_or_update_many([item(1, "a"), item(2, "b")]);
        let _ = cache.capture_changes_and_clean();

        cache.reset([item(3, "c")]);
        let changes = cache.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Reset);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn contains_item_uses_injected_equality() {
        fn eq_by_id(a: &Item, b: &Item) -> bool {
            a.id == b.id
        }

        let mut cache: ChangeTrackingCache<u32, Item> =
            ChangeTrackingCache::with_equality(|i: &Item| i.id, eq_by_id);
        cache.insert_or_update(item(1, "a"));

        // Same id counts as the same item under eq_by_id.
        assert!(cache.contains_item(&item(1, "different")));
    }
}
