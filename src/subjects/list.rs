// ============================================================================
// ripple-collections - SubjectList
// An index-ordered list publishing change sets to subscribers
// ============================================================================

use std::rc::Rc;

use crate::changes::IndexedChangeSet;
use crate::core::equality::EqualsFn;
use crate::core::error::CollectionError;
use crate::stream::{observer_fn, Observer, Subscription};
use crate::tracking::ChangeTrackingList;

use super::core::SubjectCore;
use super::observe::observe_indexed_value;
use super::suspend::SuspensionGuard;

/// A [`ChangeTrackingList`] wrapped with reactive streams, including
/// per-index value observation.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use ripple_collections::subjects::SubjectList;
///
/// let list = SubjectList::new();
/// list.push_range([10, 20, 30]);
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// let _sub = list.observe_index_fn(1, move |v: &i32| sink.borrow_mut().push(*v));
///
/// list.set(1, 25).unwrap();
/// assert_eq!(*seen.borrow(), vec![20, 25]);
/// ```
pub struct SubjectList<T>
where
    T: Clone + 'static,
{
    core: Rc<SubjectCore<ChangeTrackingList<T>>>,
}

impl<T> SubjectList<T>
where
    T: Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self::from_engine(ChangeTrackingList::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_engine(ChangeTrackingList::with_capacity(capacity))
    }
}

impl<T> SubjectList<T>
where
    T: Clone + 'static,
{
    /// Construct with a custom element-equality relation.
    pub fn with_equality(equals: EqualsFn<T>) -> Self {
        Self::from_engine(ChangeTrackingList::with_equality(equals))
    }

    fn from_engine(engine: ChangeTrackingList<T>) -> Self {
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

    /// The element at `index`, cloned.
    pub fn item_at(&self, index: usize) -> Option<T> {
        self.core.collection().borrow().get(index).cloned()
    }

    /// Like [`item_at`](Self::item_at) but failing with
    /// [`CollectionError::IndexOutOfBounds`].
    pub fn try_item_at(&self, index: usize) -> Result<T, CollectionError> {
        self.core.collection().borrow().try_get(index).cloned()
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.core.collection().borrow().index_of(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.core.collection().borrow().contains(item)
    }

    /// Snapshot of the current elements at time of retrieval.
    pub fn to_vec(&self) -> Vec<T> {
        self.core.collection().borrow().to_vec()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    pub fn push(&self, item: T) {
        self.core.collection().borrow_mut().push(item);
        self.core.publish_pending();
    }

    pub fn insert(&self, index: usize, item: T) -> Result<(), CollectionError> {
        self.core.collection().borrow_mut().insert(index, item)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn push_range<I>(&self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.core.collection().borrow_mut().push_range(items);
        self.core.publish_pending();
    }

    pub fn insert_range<I>(&self, index: usize, items: I) -> Result<(), CollectionError>
    where
        I: IntoIterator<Item = T>,
    {
        self.core
            .collection()
            .borrow_mut()
            .insert_range(index, items)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn remove_at(&self, index: usize) -> Result<T, CollectionError> {
        let removed = self.core.collection().borrow_mut().remove_at(index)?;
        self.core.publish_pending();
        Ok(removed)
    }

    pub fn remove(&self, item: &T) -> bool {
        let changed = self.core.collection().borrow_mut().remove(item);
        self.core.publish_pending();
        changed
    }

    pub fn remove_range(&self, index: usize, count: usize) -> Result<(), CollectionError> {
        self.core
            .collection()
            .borrow_mut()
            .remove_range(index, count)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn set(&self, index: usize, item: T) -> Result<(), CollectionError> {
        self.core.collection().borrow_mut().set(index, item)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn move_item(&self, old_index: usize, new_index: usize) -> Result<(), CollectionError> {
        self.core
            .collection()
            .borrow_mut()
            .move_item(old_index, new_index)?;
        self.core.publish_pending();
        Ok(())
    }

    pub fn clear(&self) {
        self.core.collection().borrow_mut().clear();
        self.core.publish_pending();
    }

    pub fn reset<I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let changed = self.core.collection().borrow_mut().reset(items);
        self.core.publish_pending();
        changed
    }

    // =========================================================================
    // STREAMS
    // =========================================================================

    /// Snapshot-then-stream subscription to the change-set stream.
    pub fn subscribe(&self, observer: Rc<dyn Observer<IndexedChangeSet<T>>>) -> Subscription {
        self.core.subscribe(observer)
    }

    /// Closure convenience for [`subscribe`](Self::subscribe).
    pub fn subscribe_fn(&self, f: impl Fn(&IndexedChangeSet<T>) + 'static) -> Subscription {
        self.subscribe(observer_fn(f))
    }

    /// Valueless tick emitted before each published batch.
    pub fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        self.core.on_collection_changed(observer)
    }

    /// Stream of latest values at `index`, compared with the list's
    /// equality relation; completes when the index leaves the list's
    /// bounds. Completion is terminal.
    pub fn observe_index(&self, index: usize, observer: Rc<dyn Observer<T>>) -> Subscription {
        let equals = self.core.collection().borrow().equals_fn();
        observe_indexed_value(
            &self.core,
            index,
            observer,
            equals,
            Rc::new(|engine: &ChangeTrackingList<T>, at: usize| engine.get(at).cloned()),
        )
    }

    /// Closure convenience for [`observe_index`](Self::observe_index).
    pub fn observe_index_fn(&self, index: usize, f: impl Fn(&T) + 'static) -> Subscription {
        self.observe_index(index, observer_fn(f))
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

impl<T> Default for SubjectList<T>
where
    T: Clone + PartialEq + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SubjectList<T>
where
    T: Clone + 'static,
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
