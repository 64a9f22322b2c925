// ============================================================================
// ripple-collections - SubjectCore
// Shared plumbing behind every subject shape
// ============================================================================
//
// Owns the engine plus three streams: the change-set stream, the valueless
// "collection changed" tick stream, and the internal "notifications
// resumed" tick stream. Publication order within one batch: tick first,
// then the change set.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::trace;

use crate::stream::{Observer, Subscription, Topic};
use crate::tracking::ChangeTracking;

use super::suspend::SuspensionGuard;

pub(crate) struct SubjectCore<C: ChangeTracking> {
    collection: RefCell<C>,
    changes: Topic<C::Changes>,
    changed: Topic<()>,
    resumed: Topic<()>,
    suspensions: Cell<usize>,
    deferred: RefCell<Vec<Box<dyn FnOnce()>>>,
    disposed: Cell<bool>,
}

impl<C: ChangeTracking + 'static> SubjectCore<C> {
    /// Wrap an engine. Change collection starts disabled and is enabled by
    /// the first subscriber: zero observers, zero change-collection work.
    pub(crate) fn new(mut collection: C) -> Rc<Self> {
        collection.set_change_collection(false);
        Rc::new(Self {
            collection: RefCell::new(collection),
            changes: Topic::new(),
            changed: Topic::new(),
            resumed: Topic::new(),
            suspensions: Cell::new(0),
            deferred: RefCell::new(Vec::new()),
            disposed: Cell::new(false),
        })
    }

    pub(crate) fn collection(&self) -> &RefCell<C> {
        &self.collection
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub(crate) fn is_suspended(&self) -> bool {
        self.suspensions.get() != 0
    }

    pub(crate) fn enable_change_collection(&self) {
        self.collection.borrow_mut().set_change_collection(true);
    }

    // =========================================================================
    // PUBLICATION
    // =========================================================================

    /// Flush the pending batch: no-op while suspended, disposed, or clean.
    /// Emits the changed tick strictly before the change set.
    pub(crate) fn publish_pending(&self) {
        if self.suspensions.get() != 0 || self.disposed.get() {
            return;
        }
        if !self.collection.borrow().is_dirty() {
            return;
        }

        self.changed.emit(&());
        let batch = self.collection.borrow_mut().capture_changes_and_clean();
        self.changes.emit(&batch);
    }

    // =========================================================================
    // SUBSCRIPTION
    // =========================================================================

    /// Snapshot-then-stream subscribe. During a suspension the snapshot is
    /// deferred until notifications resume, so the subscriber sees one
    /// consistent view instead of a snapshot plus a stale pending batch.
    pub(crate) fn subscribe(
        self: &Rc<Self>,
        observer: Rc<dyn Observer<C::Changes>>,
    ) -> Subscription {
        if self.disposed.get() {
            observer.on_completed();
            return Subscription::empty();
        }

        if self.suspensions.get() == 0 {
            self.enable_change_collection();
            return self.attach_with_snapshot(observer);
        }

        // Collection is enabled only at attach time: a deferred subscriber
        // that is cancelled before the suspension ends must not leave
        // change collection running with zero observers.
        let slot = SubscriptionSlot::new();
        let weak = Rc::downgrade(self);
        let filler = slot.clone();
        self.defer(Box::new(move || {
            if let Some(core) = weak.upgrade() {
                if !filler.is_cancelled() {
                    core.enable_change_collection();
                    filler.fill(core.attach_with_snapshot(observer));
                }
            }
        }));
        slot.into_subscription()
    }

    fn attach_with_snapshot(self: &Rc<Self>, observer: Rc<dyn Observer<C::Changes>>) -> Subscription {
        let snapshot = self.collection.borrow().snapshot_changes();
        observer.on_next(&snapshot);
        self.attach_observer(observer)
    }

    /// Attach an observer to the live change-set stream without a snapshot,
    /// wrapped so that dropping the subscription re-evaluates gating.
    pub(crate) fn attach_observer(
        self: &Rc<Self>,
        observer: Rc<dyn Observer<C::Changes>>,
    ) -> Subscription {
        let topic_sub = self.changes.subscribe(observer);
        let weak = Rc::downgrade(self);
        Subscription::new(move || {
            drop(topic_sub);
            if let Some(core) = weak.upgrade() {
                core.reevaluate_gating();
            }
        })
    }

    /// Attach to the valueless "collection changed" tick stream.
    pub(crate) fn on_collection_changed(&self, observer: Rc<dyn Observer<()>>) -> Subscription {
        self.changed.subscribe(observer)
    }

    fn reevaluate_gating(&self) {
        if self.disposed.get() {
            return;
        }
        let enabled = self.changes.has_observers();
        self.collection.borrow_mut().set_change_collection(enabled);
        if !enabled {
            trace!("change collection disabled: no observers remain");
        }
    }

    // =========================================================================
    // SUSPENSION
    // =========================================================================

    pub(crate) fn suspend(self: &Rc<Self>) -> SuspensionGuard {
        self.suspensions.set(self.suspensions.get() + 1);
        let weak = Rc::downgrade(self);
        SuspensionGuard::new(move || {
            if let Some(core) = weak.upgrade() {
                core.end_suspension();
            }
        })
    }

    fn end_suspension(self: &Rc<Self>) {
        let remaining = self.suspensions.get().saturating_sub(1);
        self.suspensions.set(remaining);
        if remaining != 0 {
            return;
        }

        trace!("notifications resumed, flushing pending batch");
        self.publish_pending();
        self.resumed.emit(&());
        self.run_deferred();
    }

    /// Queue work (deferred snapshots and value observations) for the end
    /// of the current suspension.
    pub(crate) fn defer(&self, action: Box<dyn FnOnce()>) {
        self.deferred.borrow_mut().push(action);
    }

    fn run_deferred(&self) {
        let actions: Vec<Box<dyn FnOnce()>> = self.deferred.borrow_mut().drain(..).collect();
        for action in actions {
            action();
        }
    }

    // =========================================================================
    // DISPOSAL
    // =========================================================================

    /// Complete and release all owned streams. Later mutations still apply
    /// to storage but publish nothing; later subscribers complete
    /// immediately.
    pub(crate) fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        trace!("subject disposed");
        self.deferred.borrow_mut().clear();
        self.collection.borrow_mut().set_change_collection(false);
        self.changed.complete();
        self.changes.complete();
        self.resumed.complete();
    }
}

// =============================================================================
// SUBSCRIPTION SLOT
// =============================================================================
//
// Hands a Subscription out immediately for work that only attaches when the
// current suspension ends. Cancelling the slot before attachment skips the
// deferred work; cancelling after tears the attached subscription down.
// =============================================================================

pub(crate) struct SubscriptionSlot {
    inner: Rc<SlotState>,
}

struct SlotState {
    sub: RefCell<Option<Subscription>>,
    cancelled: Cell<bool>,
}

impl SubscriptionSlot {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(SlotState {
                sub: RefCell::new(None),
                cancelled: Cell::new(false),
            }),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    pub(crate) fn fill(&self, sub: Subscription) {
        if self.inner.cancelled.get() {
            drop(sub);
        } else {
            *self.inner.sub.borrow_mut() = Some(sub);
        }
    }

    pub(crate) fn into_subscription(self) -> Subscription {
        let inner = self.inner;
        Subscription::new(move || {
            inner.cancelled.set(true);
            inner.sub.borrow_mut().take();
        })
    }
}

impl Clone for SubscriptionSlot {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
