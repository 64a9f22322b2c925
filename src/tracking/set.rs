// ============================================================================
// ripple-collections - ChangeTrackingSet
// A distinct-element set that records each mutation
// ============================================================================

use std::collections::HashSet;
use std::hash::Hash;

use crate::changes::{ChangeSetBuilder, ChangeSetKind, DistinctChange, DistinctChangeSet};

use super::ChangeTracking;

/// A hash set that records every effective mutation as a
/// [`DistinctChange`].
///
/// Element equality is the `Eq + Hash` implementation of `T` (the backing
/// set's relation). Ineffective operations — inserting a present element,
/// removing an absent one — touch neither storage, builder, nor dirty flag.
///
/// # Example
///
/// ```
/// use ripple_collections::tracking::ChangeTrackingSet;
/// use ripple_collections::changes::ChangeSetKind;
///
/// let mut set = ChangeTrackingSet::new();
/// set.insert(1);
/// set.insert(2);
/// set.insert(1); // already present: no change recorded
///
/// let changes = set.capture_changes_and_clean();
/// assert_eq!(changes.len(), 2);
/// assert_eq!(changes.kind(), ChangeSetKind::Update);
/// ```
pub struct ChangeTrackingSet<T> {
    items: HashSet<T>,
    builder: ChangeSetBuilder<DistinctChange<T>>,
    collect_changes: bool,
    dirty: bool,
}

impl<T> ChangeTrackingSet<T>
where
    T: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            items: HashSet::new(),
            builder: ChangeSetBuilder::new(),
            collect_changes: true,
            dirty: false,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: HashSet::with_capacity(capacity),
            builder: ChangeSetBuilder::with_capacity(capacity),
            collect_changes: true,
            dirty: false,
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, T> {
        self.items.iter()
    }

    /// Snapshot of the current elements, in iteration order.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Insert `item` if absent. Returns true iff the set changed.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        if self.collect_changes {
            self.builder.add_change(DistinctChange::Addition {
                item: item.clone(),
            });
        }
        self.items.insert(item);
        self.dirty = true;
        true
    }

    /// Delete `item` if present. Returns true iff the set changed.
    pub fn remove(&mut self, item: &T) -> bool {
        if !self.items.remove(item) {
            return false;
        }
        if self.collect_changes {
            self.builder.add_change(DistinctChange::Removal {
                item: item.clone(),
            });
        }
        self.dirty = true;
        true
    }

    /// Empty the set, recording one removal per prior element in iteration
    /// order followed by the source-cleared signal.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.collect_changes {
            self.builder.ensure_capacity(self.items.len());
            for item in self.items.iter() {
                self.builder.add_change(DistinctChange::Removal {
                    item: item.clone(),
                });
            }
            self.builder.on_source_cleared();
        }
        self.items.clear();
        self.dirty = true;
    }

    /// Insert every element of `other` not already present.
    /// Returns true iff the set changed.
    pub fn union_with<I>(&mut self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for item in other {
            changed |= self.insert(item);
        }
        changed
    }

    /// Delete every element of `other` that is present. Records the
    /// source-cleared signal when deletions empty the set.
    /// Returns true iff the set changed.
    pub fn except_with<'a, I>(&mut self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut changed = false;
        for item in other {
            changed |= self.remove(item);
        }
        if changed && self.items.is_empty() && self.collect_changes {
            self.builder.on_source_cleared();
        }
        changed
    }

    /// Retain only elements also present in `other`. Records the
    /// source-cleared signal when deletions empty the set.
    /// Returns true iff the set changed.
    pub fn intersect_with<I>(&mut self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let keep: HashSet<T> = other.into_iter().collect();
        let dropped: Vec<T> = self
            .items
            .iter()
            .filter(|item| !keep.contains(*item))
            .cloned()
            .collect();

        if dropped.is_empty() {
            return false;
        }
        for item in &dropped {
            self.items.remove(item);
            if self.collect_changes {
                self.builder.add_change(DistinctChange::Removal {
                    item: item.clone(),
                });
            }
        }
        if self.items.is_empty() && self.collect_changes {
            self.builder.on_source_cleared();
        }
        self.dirty = true;
        true
    }

    /// Toggle membership of every element of `other`: present elements are
    /// deleted, absent ones inserted. Returns true iff the set changed.
    pub fn symmetric_except_with<I>(&mut self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut changed = false;
        for item in other {
            if self.items.contains(&item) {
                changed |= self.remove(&item);
            } else {
                changed |= self.insert(item);
            }
        }
        changed
    }

    /// Replace the entire contents with `items`: clear, then re-add. The
    /// composed batch classifies as `Clear` (empty `items`) or `Reset`.
    /// Returns true iff the set changed.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let was_non_empty = !self.items.is_empty();
        self.clear();
        let added = self.union_with(items);
        was_non_empty || added
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
            // Buffered changes would be inconsistent with a later resumption.
            self.builder.clear();
        }
        self.collect_changes = enabled;
    }

    /// Emit the buffered change set (empty while collection is disabled)
    /// and clear the dirty flag.
    pub fn capture_changes_and_clean(&mut self) -> DistinctChangeSet<T> {
        self.dirty = false;
        if !self.collect_changes {
            return DistinctChangeSet::empty();
        }
        self.builder.build_and_clear(true)
    }

    /// Synthesise a change set of the full current contents: one addition
    /// per element. Applied to an empty set it yields the current state.
    pub fn snapshot_changes(&self) -> DistinctChangeSet<T> {
        let changes: Vec<DistinctChange<T>> = self
            .items
            .iter()
            .map(|item| DistinctChange::Addition {
                item: item.clone(),
            })
            .collect();
        DistinctChangeSet::new(changes, ChangeSetKind::Update)
    }
}

impl<T> Default for ChangeTrackingSet<T>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeTracking for ChangeTrackingSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    type Changes = DistinctChangeSet<T>;

    fn is_dirty(&self) -> bool {
        ChangeTrackingSet::is_dirty(self)
    }

    fn is_change_collection_enabled(&self) -> bool {
        ChangeTrackingSet::is_change_collection_enabled(self)
    }

    fn set_change_collection(&mut self, enabled: bool) {
        ChangeTrackingSet::set_change_collection(self, enabled)
    }

    fn capture_changes_and_clean(&mut self) -> DistinctChangeSet<T> {
        ChangeTrackingSet::capture_changes_and_clean(self)
    }

    fn snapshot_changes(&self) -> DistinctChangeSet<T> {
        ChangeTrackingSet::snapshot_changes(self)
    }
}

impl<T> std::fmt::Debug for ChangeTrackingSet<T>
where
    T: Eq + Hash + Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTrackingSet")
            .field("items", &self.items)
            .field("dirty", &self.dirty)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn removed_items(set: &DistinctChangeSet<i32>) -> HashSet<i32> {
        set.iter()
            .map(|c| *c.removed_item().expect("removal"))
            .collect()
    }

    #[test]
    fn insert_records_addition_once() {
        let mut set = ChangeTrackingSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert!(set.is_dirty());

        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.changes()[0].added_item(), Ok(&1));
        assert!(!set.is_dirty());
    }

    #[test]
    fn remove_absent_is_silent() {
        let mut set: ChangeTrackingSet<i32> = ChangeTrackingSet::new();
        assert!(!set.remove(&7));
        assert!(!set.is_dirty());
        assert!(set.capture_changes_and_clean().is_empty());
    }

    #[test]
    fn clear_classifies_as_clear() {
        let mut set = ChangeTrackingSet::new();
        set.insert(1);
        set.insert(2);
        let _ = set.capture_changes_and_clean();

        set.clear();
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Clear);
        assert_eq!(removed_items(&changes), HashSet::from([1, 2]));
        assert!(set.is_empty());
    }

    #[test]
    fn clear_on_empty_set_is_silent() {
        let mut set: ChangeTrackingSet<i32> = ChangeTrackingSet::new();
        set.clear();
        assert!(!set.is_dirty());
        assert!(set.capture_changes_and_clean().is_empty());
    }

    #[test]
    fn union_with_records_new_elements_only() {
        let mut set = ChangeTrackingSet::new();
        set.insert(1);
        let _ = set.capture_changes_and_clean();

        assert!(set.union_with([1, 2, 3]));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.is_addition()));
    }

    #[test]
    fn except_with_emptying_classifies_as_clear() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2]);
        let _ = set.capture_changes_and_clean();

        let other = vec![1, 2, 3];
        assert!(set.except_with(other.iter()));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Clear);
        assert_eq!(removed_items(&changes), HashSet::from([1, 2]));
    }

    #[test]
    fn except_with_partial_classifies_as_update() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2, 3]);
        let _ = set.capture_changes_and_clean();

        let other = vec![1];
        set.except_with(other.iter());
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Update);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn intersect_with_drops_missing_elements() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2, 3, 4]);
        let _ = set.capture_changes_and_clean();

        assert!(set.intersect_with([2, 4, 9]));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Update);
        assert_eq!(removed_items(&changes), HashSet::from([1, 3]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn intersect_with_disjoint_classifies_as_clear() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2]);
        let _ = set.capture_changes_and_clean();

        assert!(set.intersect_with([8, 9]));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Clear);
        assert!(set.is_empty());
    }

    #[test]
    fn intersect_with_superset_is_silent() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2]);
        let _ = set.capture_changes_and_clean();

        assert!(!set.intersect_with([1, 2, 3]));
        assert!(!set.is_dirty());
    }

    #[test]
    fn symmetric_except_with_toggles() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2]);
        let _ = set.capture_changes_and_clean();

        assert!(set.symmetric_except_with([2, 3]));
        assert!(!set.contains(&2));
        assert!(set.contains(&3));

        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.len(), 2);
        assert!(changes.changes()[0].is_removal());
        assert!(changes.changes()[1].is_addition());
    }

    #[test]
    fn reset_classifies_as_reset() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2]);
        let _ = set.capture_changes_and_clean();

        assert!(set.reset([3, 4]));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Reset);
        assert_eq!(changes.len(), 4);
        assert_eq!(set.to_vec().len(), 2);
    }

    #[test]
    fn reset_to_empty_classifies_as_clear() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2]);
        let _ = set.capture_changes_and_clean();

        assert!(set.reset(std::iter::empty()));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Clear);
    }

    #[test]
    fn reset_of_empty_set_classifies_as_update() {
        let mut set = ChangeTrackingSet::new();
        assert!(set.reset([1, 2]));
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.kind(), ChangeSetKind::Update);
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn disabled_collection_skips_builder_but_not_dirty() {
        let mut set = ChangeTrackingSet::new();
        set.set_change_collection(false);

        set.insert(1);
        set.insert(2);
        assert!(set.is_dirty());
        assert_eq!(set.len(), 2);

        let changes = set.capture_changes_and_clean();
        assert!(changes.is_empty());
        assert!(!set.is_dirty());
    }

    #[test]
    fn disabling_discards_buffered_changes() {
        let mut set = ChangeTrackingSet::new();
        set.insert(1);
        set.set_change_collection(false);
        set.set_change_collection(true);

        set.insert(2);
        let changes = set.capture_changes_and_clean();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes.changes()[0].added_item(), Ok(&2));
    }

    #[test]
    fn snapshot_rebuilds_current_state() {
        let mut set = ChangeTrackingSet::new();
        set.union_with([1, 2, 3]);

        let snapshot = set.snapshot_changes();
        assert_eq!(snapshot.kind(), ChangeSetKind::Update);
        let items: HashSet<i32> = snapshot
            .iter()
            .map(|c| *c.added_item().expect("addition"))
            .collect();
        assert_eq!(items, HashSet::from([1, 2, 3]));
    }
}
