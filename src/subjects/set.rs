// ============================================================================
// ripple-collections - SubjectSet
// A distinct-element set publishing change sets to subscribers
// ============================================================================

use std::hash::Hash;
use std::rc::Rc;

use crate::changes::DistinctChangeSet;
use crate::stream::{observer_fn, Observer, Subscription};
use crate::tracking::ChangeTrackingSet;

use super::core::SubjectCore;
use super::suspend::SuspensionGuard;

/// A [`ChangeTrackingSet`] wrapped with reactive streams.
///
/// Every public mutation publishes the pending batch synchronously before
/// returning. `SubjectSet` is a cheap-clone handle; clones share state.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use ripple_collections::subjects::SubjectSet;
///
/// let set = SubjectSet::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = seen.clone();
/// let _sub = set.subscribe_fn(move |changes| {
///     sink.borrow_mut().push(changes.len());
/// });
///
/// set.insert(1); // snapshot (0 changes) then one addition
/// assert_eq!(*seen.borrow(), vec![0, 1]);
/// ```
pub struct SubjectSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    core: Rc<SubjectCore<ChangeTrackingSet<T>>>,
}

impl<T> SubjectSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    pub fn new() -> Self {
        Self {
            core: SubjectCore::new(ChangeTrackingSet::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            core: SubjectCore::new(ChangeTrackingSet::with_capacity(capacity)),
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

    pub fn insert(&self, item: T) -> bool {
        let changed = self.core.collection().borrow_mut().insert(item);
        self.core.publish_pending();
        changed
    }

    pub fn remove(&self, item: &T) -> bool {
        let changed = self.core.collection().borrow_mut().remove(item);
        self.core.publish_pending();
        changed
    }

    pub fn clear(&self) {
        self.core.collection().borrow_mut().clear();
        self.core.publish_pending();
    }

    pub fn union_with<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let changed = self.core.collection().borrow_mut().union_with(other);
        self.core.publish_pending();
        changed
    }

    pub fn except_with<'a, I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let changed = self.core.collection().borrow_mut().except_with(other);
        self.core.publish_pending();
        changed
    }

    pub fn intersect_with<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let changed = self.core.collection().borrow_mut().intersect_with(other);
        self.core.publish_pending();
        changed
    }

    pub fn symmetric_except_with<I>(&self, other: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let changed = self
            .core
            .collection()
            .borrow_mut()
            .symmetric_except_with(other);
        self.core.publish_pending();
        changed
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
    pub fn subscribe(&self, observer: Rc<dyn Observer<DistinctChangeSet<T>>>) -> Subscription {
        self.core.subscribe(observer)
    }

    /// Closure convenience for [`subscribe`](Self::subscribe).
    pub fn subscribe_fn(&self, f: impl Fn(&DistinctChangeSet<T>) + 'static) -> Subscription {
        self.subscribe(observer_fn(f))
    }

    /// Valueless tick emitted before each published batch.
    pub fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        self.core.on_collection_changed(observer)
    }

    /// Suspend publication until every outstanding guard is released, then
    /// flush accumulated changes as a single batch.
    pub fn suspend_notifications(&self) -> SuspensionGuard {
        self.core.suspend()
    }

    /// Complete and release all owned streams.
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

impl<T> Default for SubjectSet<T>
where
    T: Eq + Hash + Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SubjectSet<T>
where
    T: Eq + Hash + Clone + 'static,
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
