// ============================================================================
// ripple-collections - ChangeTrackingDictionary
// A keyed map with explicit keys that records each mutation
// ============================================================================

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::changes::{ChangeSetBuilder, ChangeSetKind, KeyedChange, KeyedChangeSet};
use crate::core::equality::{default_equals, EqualsFn};
use crate::core::error::CollectionError;

use super::ChangeTracking;

/// A hash map that records every effective mutation as a [`KeyedChange`].
///
/// Key equality is the `Eq + Hash` implementation of `K` (the backing
/// map's relation). Value equality is an injected [`EqualsFn`] used to
/// suppress no-op replacements: writing a value equal to the stored one
/// records nothing and leaves the dirty flag untouched.
///
/// # Example
///
/// ```
/// use ripple_collections::tracking::ChangeTrackingDictionary;
/// use ripple_collections::changes::ChangeSetKind;
///
/// let mut map = ChangeTrackingDictionary::new();
/// map.insert_or_replace("a", 1);
/// map.insert_or_replace("a", 1); // equal value: suppressed
/// map.insert_or_replace("a", 2); // replacement
///
/// let changes = map.capture_changes_and_clean();
/// assert_eq!(changes.len(), 2);
/// ```
pub struct ChangeTrackingDictionary<K, V> {
    entries: HashMap<K, V>,
    builder: ChangeSetBuilder<KeyedChange<K, V>>,
    value_equals: EqualsFn<V>,
    collect_changes: bool,
    dirty: bool,
}

impl<K, V> ChangeTrackingDictionary<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::with_equality(default_equals)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_equality(capacity, default_equals)
    }
}

impl<K, V> ChangeTrackingDictionary<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Construct with a custom value-equality relation.
    pub fn with_equality(value_equals: EqualsFn<V>) -> Self {
        Self {
            entries: HashMap::new(),
            builder: ChangeSetBuilder::new(),
            value_equals,
            collect_changes: true,
            dirty: false,
        }
    }

    pub fn with_capacity_and_equality(capacity: usize, value_equals: EqualsFn<V>) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            builder: ChangeSetBuilder::with_capacity(capacity),
            value_equals,
            collect_changes: true,
            dirty: false,
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

    /// True iff `key` maps to a value equal to `value` under the injected
    /// relation.
    pub fn contains_pair(&self, key: &K, value: &V) -> bool {
        match self.entries.get(key) {
            Some(stored) => (self.value_equals)(stored, value),
            None => false,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Like [`get`](Self::get) but failing with
    /// [`CollectionError::KeyNotFound`] on a missing key.
    pub fn try_get(&self, key: &K) -> Result<&V, CollectionError> {
        self.entries.get(key).ok_or(CollectionError::KeyNotFound)
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
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Insert a new entry, failing with [`CollectionError::DuplicateKey`]
    /// (state unchanged) if `key` is already present.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), CollectionError> {
        if self.entries.contains_key(&key) {
            return Err(CollectionError::DuplicateKey);
        }
        self.insert_new(key, value);
        Ok(())
    }

    /// Insert if absent, replace if the stored value differs under the
    /// injected relation, no-op otherwise. Returns true iff storage changed.
    pub fn insert_or_replace(&mut self, key: K, value: V) -> bool {
        match self.entries.get_mut(&key) {
            None => {
                self.insert_new(key, value);
                true
            }
            Some(stored) => {
                if (self.value_equals)(stored, &value) {
                    return false;
                }
                let old_item = stored.clone();
                *stored = value.clone();
                if self.collect_changes {
                    self.builder.add_change(KeyedChange::Replacement {
                        key,
                        old_item,
                        new_item: value,
                    });
                }
                self.dirty = true;
                true
            }
        }
    }

    /// Delete the entry under `key`, returning its value. Records the
    /// source-cleared signal when the deletion empties the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let old = self.entries.remove(key)?;
        if self.collect_changes {
            self.builder.add_change(KeyedChange::Removal {
                key: key.clone(),
                item: old.clone(),
            });
            if self.entries.is_empty() {
                self.builder.on_source_cleared();
            }
        }
        self.dirty = true;
        Some(old)
    }

    /// Delete the entry under `key` only if its value equals `value` under
    /// the injected relation. Returns true iff the map changed.
    pub fn remove_pair(&mut self, key: &K, value: &V) -> bool {
        if !self.contains_pair(key, value) {
            return false;
        }
        self.remove(key).is_some()
    }

    /// Insert several new entries, all-or-nothing: every key is validated
    /// against the map and against the batch itself before any mutation, so
    /// a [`CollectionError::DuplicateKey`] leaves the map untouched.
    pub fn try_insert_many<I>(&mut self, pairs: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs: Vec<(K, V)> = pairs.into_iter().collect();

        {
            let mut batch_keys: HashSet<&K> = HashSet::with_capacity(pairs.len());
            for (key, _) in &pairs {
                if self.entries.contains_key(key) || !batch_keys.insert(key) {
                    return Err(CollectionError::DuplicateKey);
                }
            }
        }

        if self.collect_changes {
            self.builder.ensure_capacity(pairs.len());
        }
        for (key, value) in pairs {
            self.insert_new(key, value);
        }
        Ok(())
    }

    /// Apply [`insert_or_replace`](Self::insert_or_replace) per element.
    /// Returns true iff the map changed.
    pub fn insert_or_replace_many<I>(&mut self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let pairs = pairs.into_iter();
        if self.collect_changes {
            self.builder.ensure_capacity(pairs.size_hint().0);
        }
        let mut changed = false;
        for (key, value) in pairs {
            changed |= self.insert_or_replace(key, value);
        }
        changed
    }

    /// Delete each present key; absent keys are ignored. Returns the number
    /// of entries removed.
    pub fn remove_many<'a, I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut removed = 0;
        for key in keys {
            if self.remove(key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Empty the map, recording one removal per entry in iteration order
    /// followed by the source-cleared signal.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.collect_changes {
            self.builder.ensure_capacity(self.entries.len());
            for (key, value) in self.entries.iter() {
                self.builder.add_change(KeyedChange::Removal {
                    key: key.clone(),
                    item: value.clone(),
                });
            }
            self.builder.on_source_cleared();
        }
        self.entries.clear();
        self.dirty = true;
    }

    /// Replace the entire contents: clear, then insert-or-replace `pairs`.
    /// The composed batch classifies as `Clear` (empty `pairs`) or `Reset`.
    /// Returns true iff the map changed.
    pub fn reset<I>(&mut self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let was_non_empty = !self.entries.is_empty();
        self.clear();
        let added = self.insert_or_replace_many(pairs);
        was_non_empty || added
    }

    fn insert_new(&mut self, key: K, value: V) {
        if self.collect_changes {
            self.builder.add_change(KeyedChange::Addition {
                key: key.clone(),
                item: value.clone(),
            });
        }
        self.entries.insert(key, value);
        self.dirty = true;
    }

    // =========================================================================
    // CAPTURE
    // =========================================================================

    /// True iff at least one state-changing operation has occurred since
    /// construction or the last capture.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_change_collection_enabled(&self) -> bool {
        self.collect_changes
    }

    /// Enable or disable change collection. Disabling discards any buffered
    /// changes; re-enabling starts a fresh empty buffer.
    pub fn set_change_collection(&mut self, enabled: bool) {
        if self.collect_changes && !enabled {
            self.builder.clear();
        }
        self.collect_changes = enabled;
    }

    /// Emit the buffered change set (empty while collection is disabled)
    /// and clear the dirty flag.
    pub fn capture_changes_and_clean(&mut self) -> KeyedChangeSet<K, V> {
        self.dirty = false;
        if !self.collect_changes {
            return KeyedChangeSet::empty();
        }
        self.builder.build_and_clear(true)
    }

    /// Synthesise a change set of the full current contents: one addition
    /// per entry. Applied to an empty map it yields the current state.
    pub fn snapshot_changes(&self) -> KeyedChangeSet<K, V> {
        let changes: Vec<KeyedChange<K, V>> = self
            .entries
            .iter()
            .map(|(key, value)| KeyedChange::Addition {
                key: key.clone(),
                item: value.clone(),
            })
            .collect();
        KeyedChangeSet::new(changes, ChangeSetKind::Update)
    }
}

impl<K, V> Default for ChangeTrackingDictionary<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChangeTracking for ChangeTrackingDictionary<K, V>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
{
    type Changes = KeyedChangeSet<K, V>;

    fn is_dirty(&self) -> bool {
        ChangeTrackingDictionary::is_dirty(self)
    }

    fn is_change_collection_enabled(&self) -> bool {
        ChangeTrackingDictionary::is_change_collection_enabled(self)
    }

    fn set_change_collection(&mut self, enabled: bool) {
        ChangeTrackingDictionary::set_change_collection(self, enabled)
    }

    fn capture_changes_and_clean(&mut self) -> KeyedChangeSet<K, V> {
        ChangeTrackingDictionary::capture_changes_and_clean(self)
    }

    fn snapshot_changes(&self) -> KeyedChangeSet<K, V> {
        ChangeTrackingDictionary::snapshot_changes(self)
    }
}

impl<K, V> std::fmt::Debug for ChangeTrackingDictionary<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTrackingDictionary")
            .field("entries", &self.entries)
            .field("dirty", &self.dirty)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
