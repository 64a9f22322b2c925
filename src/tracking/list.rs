// ============================================================================
// ripple-collections - ChangeTrackingList
// An index-ordered list that records each mutation
// ============================================================================
//
// Removal ordering rule: several removals produced by one operation (clear,
// remove_range) are recorded in descending index order so that a consumer
// applying them sequentially sees valid indices at each step. Insertions
// are recorded ascending.
// ============================================================================

use crate::changes::{ChangeSetBuilder, ChangeSetKind, IndexedChange, IndexedChangeSet};
use crate::core::equality::{default_equals, EqualsFn};
use crate::core::error::CollectionError;

use super::ChangeTracking;

/// A dynamic array that records every effective mutation as an
/// [`IndexedChange`].
///
/// The injected equality relation is used to suppress no-op replacements at
/// an index and to locate elements for [`remove`](Self::remove).
///
/// # Example
///
/// ```
/// use ripple_collections::tracking::ChangeTrackingList;
///
/// let mut list = ChangeTrackingList::new();
/// list.push(10);
/// list.push(20);
/// list.set(1, 20).unwrap(); // equal value: suppressed
///
/// let changes = list.capture_changes_and_clean();
/// assert_eq!(changes.len(), 2);
/// ```
pub struct ChangeTrackingList<T> {
    items: Vec<T>,
    builder: ChangeSetBuilder<IndexedChange<T>>,
    equals: EqualsFn<T>,
    collect_changes: bool,
    dirty: bool,
}

impl<T> ChangeTrackingList<T>
where
    T: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::with_equality(default_equals)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_equality(capacity, default_equals)
    }
}

impl<T> ChangeTrackingList<T>
where
    T: Clone,
{
    /// Construct with a custom element-equality relation.
    pub fn with_equality(equals: EqualsFn<T>) -> Self {
        Self {
            items: Vec::new(),
            builder: ChangeSetBuilder::new(),
            equals,
            collect_changes: true,
            dirty: false,
        }
    }

    pub fn with_capacity_and_equality(capacity: usize, equals: EqualsFn<T>) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            builder: ChangeSetBuilder::with_capacity(capacity),
            equals,
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

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Like [`get`](Self::get) but failing with
    /// [`CollectionError::IndexOutOfBounds`].
    pub fn try_get(&self, index: usize) -> Result<&T, CollectionError> {
        self.items
            .get(index)
            .ok_or(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
    }

    /// The injected equality relation.
    pub fn equals_fn(&self) -> EqualsFn<T> {
        self.equals
    }

    /// First index holding an element equal to `item` under the injected
    /// relation.
    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|x| (self.equals)(x, item))
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index_of(item).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Snapshot of the current elements.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.clone()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Append at the end.
    pub fn push(&mut self, item: T) {
        if self.collect_changes {
            self.builder.add_change(IndexedChange::Insertion {
                index: self.items.len(),
                item: item.clone(),
            });
        }
        self.items.push(item);
        self.dirty = true;
    }

    /// Shift-and-insert at `index`, which may equal the current length.
    pub fn insert(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        if index > self.items.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        if self.collect_changes {
            self.builder.add_change(IndexedChange::Insertion {
                index,
                item: item.clone(),
            });
        }
        self.items.insert(index, item);
        self.dirty = true;
        Ok(())
    }

    /// Append each element in order.
    pub fn push_range<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let items = items.into_iter();
        if self.collect_changes {
            self.builder.ensure_capacity(items.size_hint().0);
        }
        for item in items {
            self.push(item);
        }
    }

    /// Shift-and-insert each element starting at `index`, ascending.
    pub fn insert_range<I>(&mut self, index: usize, items: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        if index > self.items.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let mut at = index;
        for item in items {
            // Indices stay valid: each insert grows the list by one.
            self.insert(at, item)?;
            at += 1;
        }
        Ok(())
    }

    /// Shift-and-remove the element at `index`, returning it.
    pub fn remove_at(&mut self, index: usize) -> Result<T, CollectionError> {
        if index >= self.items.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let item = self.items.remove(index);
        if self.collect_changes {
            self.builder.add_change(IndexedChange::Removal {
                index,
                item: item.clone(),
            });
        }
        self.dirty = true;
        Ok(item)
    }

    /// Remove the first element equal to `item` under the injected
    /// relation. Returns true iff the list changed.
    pub fn remove(&mut self, item: &T) -> bool {
        match self.index_of(item) {
            Some(index) => {
                // Index just came from a search; remove_at cannot fail.
                let _ = self.remove_at(index);
                true
            }
            None => false,
        }
    }

    /// Remove `count` elements starting at `index`. Removals are recorded
    /// in descending index order; removing the whole list records the
    /// source-cleared signal. Validation precedes any mutation.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<(), CollectionError> {
        let len = self.items.len();
        if index > len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        if count > len - index {
            return Err(CollectionError::InvalidRange { index, count, len });
        }
        if count == 0 {
            return Ok(());
        }

        if self.collect_changes {
            self.builder.ensure_capacity(count);
            for at in (index..index + count).rev() {
                self.builder.add_change(IndexedChange::Removal {
                    index: at,
                    item: self.items[at].clone(),
                });
            }
        }
        self.items.drain(index..index + count);
        if self.items.is_empty() && self.collect_changes {
            self.builder.on_source_cleared();
        }
        self.dirty = true;
        Ok(())
    }

    /// Replace the element at `index`; writing an equal value is a
    /// suppressed no-op. `index == len` appends instead.
    pub fn set(&mut self, index: usize, item: T) -> Result<(), CollectionError> {
        let len = self.items.len();
        if index > len {
            return Err(CollectionError::IndexOutOfBounds { index, len });
        }
        if index == len {
            self.push(item);
            return Ok(());
        }

        let old = &self.items[index];
        if (self.equals)(old, &item) {
            return Ok(());
        }
        if self.collect_changes {
            self.builder.add_change(IndexedChange::Replacement {
                index,
                old_item: old.clone(),
                new_item: item.clone(),
            });
        }
        self.items[index] = item;
        self.dirty = true;
        Ok(())
    }

    /// Move the element at `old_index` so it ends up at `new_index`,
    /// recording a single movement. Equal indices are a validated no-op.
    pub fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<(), CollectionError> {
        let len = self.items.len();
        if old_index >= len {
            return Err(CollectionError::IndexOutOfBounds {
                index: old_index,
                len,
            });
        }
        if new_index >= len {
            return Err(CollectionError::IndexOutOfBounds {
                index: new_index,
                len,
            });
        }
        if old_index == new_index {
            return Ok(());
        }

        let item = self.items.remove(old_index);
        self.items.insert(new_index, item.clone());
        if self.collect_changes {
            self.builder.add_change(IndexedChange::Movement {
                old_index,
                new_index,
                item,
            });
        }
        self.dirty = true;
        Ok(())
    }

    /// Empty the list, recording removals in descending index order
    /// followed by the source-cleared signal.
    pub fn clear(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.collect_changes {
            self.builder.ensure_capacity(self.items.len());
            for at in (0..self.items.len()).rev() {
                self.builder.add_change(IndexedChange::Removal {
                    index: at,
                    item: self.items[at].clone(),
                });
            }
            self.builder.on_source_cleared();
        }
        self.items.clear();
        self.dirty = true;
    }

    /// Replace the entire contents: clear, then append `items`. The
    /// composed batch classifies as `Clear` (empty `items`) or `Reset`.
    /// Returns true iff the list changed.
    pub fn reset<I>(&mut self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let was_non_empty = !self.items.is_empty();
        self.clear();
        let before = self.items.len();
        self.push_range(items);
        was_non_empty || self.items.len() > before
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
    pub fn capture_changes_and_clean(&mut self) -> IndexedChangeSet<T> {
        self.dirty = false;
        if !self.collect_changes {
            return IndexedChangeSet::empty();
        }
        self.builder.build_and_clear(true)
    }

    /// Synthesise a change set of the full current contents: ascending
    /// insertions. Applied to an empty list it yields the current state.
    pub fn snapshot_changes(&self) -> IndexedChangeSet<T> {
        let changes: Vec<IndexedChange<T>> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| IndexedChange::Insertion {
                index,
                item: item.clone(),
            })
            .collect();
        IndexedChangeSet::new(changes, ChangeSetKind::Update)
    }
}

impl<T> Default for ChangeTrackingList<T>
where
    T: Clone + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ChangeTracking for ChangeTrackingList<T>
where
    T: Clone + 'static,
{
    type Changes = IndexedChangeSet<T>;

    fn is_dirty(&self) -> bool {
        ChangeTrackingList::is_dirty(self)
    }

    fn is_change_collection_enabled(&self) -> bool {
        ChangeTrackingList::is_change_collection_enabled(self)
    }

    fn set_change_collection(&mut self, enabled: bool) {
        ChangeTrackingList::set_change_collection(self, enabled)
    }

    fn capture_changes_and_clean(&mut self) -> IndexedChangeSet<T> {
        ChangeTrackingList::capture_changes_and_clean(self)
    }

    fn snapshot_changes(&self) -> IndexedChangeSet<T> {
        ChangeTrackingList::snapshot_changes(self)
    }
}

impl<T> std::fmt::Debug for ChangeTrackingList<T>
where
    T: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeTrackingList")
            .field("items", &self.items)
            .field("dirty", &self.dirty)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
