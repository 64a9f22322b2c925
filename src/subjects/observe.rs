// ============================================================================
// ripple-collections - Per-Element Value Observation
// Streams of latest values for one key or index
// ============================================================================
//
// Completion is terminal: once the observed key or index disappears the
// stream completes, and a later re-addition does not reopen it. Consumers
// wanting the new lifetime re-subscribe.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::changes::{ChangeSetKind, IndexedChangeSet, KeyedChange, KeyedChangeSet};
use crate::core::equality::EqualsFn;
use crate::stream::{Observer, Subscription};
use crate::tracking::ChangeTracking;

use super::core::{SubjectCore, SubscriptionSlot};

// =============================================================================
// KEYED VALUE OBSERVATION
// =============================================================================

struct KeyedValueObservation<K, V> {
    key: K,
    downstream: Rc<dyn Observer<V>>,
    lookup: Box<dyn Fn(&K) -> Option<V>>,
    live: Cell<bool>,
    sub: RefCell<Option<Subscription>>,
}

impl<K, V> KeyedValueObservation<K, V> {
    /// Detach without signalling the downstream (consumer-initiated).
    fn cancel(&self) {
        if self.live.replace(false) {
            self.sub.borrow_mut().take();
        }
    }

    /// Terminal completion (stream-initiated).
    fn complete(&self) {
        if self.live.replace(false) {
            self.sub.borrow_mut().take();
            self.downstream.on_completed();
        }
    }
}

impl<K, V> Observer<KeyedChangeSet<K, V>> for KeyedValueObservation<K, V>
where
    K: PartialEq,
{
    fn on_next(&self, set: &KeyedChangeSet<K, V>) {
        if !self.live.get() {
            return;
        }
        match set.kind() {
            ChangeSetKind::Clear => self.complete(),
            ChangeSetKind::Reset => match (self.lookup)(&self.key) {
                Some(value) => self.downstream.on_next(&value),
                None => self.complete(),
            },
            ChangeSetKind::Update => {
                for change in set.iter() {
                    match change {
                        KeyedChange::Removal { key, .. } if *key == self.key => {
                            self.complete();
                            return;
                        }
                        KeyedChange::Replacement { key, new_item, .. } if *key == self.key => {
                            self.downstream.on_next(new_item);
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    fn on_completed(&self) {
        self.complete();
    }
}

/// Observe the latest value under `key`. Deferred while notifications are
/// suspended; completes immediately when the key is absent.
pub(crate) fn observe_keyed_value<C, K, V>(
    core: &Rc<SubjectCore<C>>,
    key: K,
    downstream: Rc<dyn Observer<V>>,
    lookup: Rc<dyn Fn(&C, &K) -> Option<V>>,
) -> Subscription
where
    C: ChangeTracking<Changes = KeyedChangeSet<K, V>> + 'static,
    K: PartialEq + 'static,
    V: 'static,
{
    if core.is_disposed() {
        downstream.on_completed();
        return Subscription::empty();
    }

    if core.is_suspended() {
        let slot = SubscriptionSlot::new();
        let weak = Rc::downgrade(core);
        let filler = slot.clone();
        core.defer(Box::new(move || {
            if let Some(core) = weak.upgrade() {
                if !filler.is_cancelled() {
                    filler.fill(attach_keyed(&core, key, downstream, lookup));
                }
            }
        }));
        return slot.into_subscription();
    }

    attach_keyed(core, key, downstream, lookup)
}

fn attach_keyed<C, K, V>(
    core: &Rc<SubjectCore<C>>,
    key: K,
    downstream: Rc<dyn Observer<V>>,
    lookup: Rc<dyn Fn(&C, &K) -> Option<V>>,
) -> Subscription
where
    C: ChangeTracking<Changes = KeyedChangeSet<K, V>> + 'static,
    K: PartialEq + 'static,
    V: 'static,
{
    core.enable_change_collection();

    let current = lookup(&*core.collection().borrow(), &key);
    let Some(value) = current else {
        downstream.on_completed();
        return Subscription::empty();
    };
    downstream.on_next(&value);

    let weak = Rc::downgrade(core);
    let lookup_current: Box<dyn Fn(&K) -> Option<V>> = Box::new(move |k| {
        weak.upgrade()
            .and_then(|core| lookup(&*core.collection().borrow(), k))
    });

    let observation = Rc::new(KeyedValueObservation {
        key,
        downstream,
        lookup: lookup_current,
        live: Cell::new(true),
        sub: RefCell::new(None),
    });
    let sub = core.attach_observer(observation.clone());
    *observation.sub.borrow_mut() = Some(sub);

    let handle = observation;
    Subscription::new(move || handle.cancel())
}

// =============================================================================
// INDEXED VALUE OBSERVATION
// =============================================================================

struct IndexedValueObservation<T> {
    index: usize,
    last: RefCell<T>,
    equals: EqualsFn<T>,
    downstream: Rc<dyn Observer<T>>,
    current: Box<dyn Fn(usize) -> Option<T>>,
    live: Cell<bool>,
    sub: RefCell<Option<Subscription>>,
}

impl<T> IndexedValueObservation<T> {
    fn cancel(&self) {
        if self.live.replace(false) {
            self.sub.borrow_mut().take();
        }
    }

    fn complete(&self) {
        if self.live.replace(false) {
            self.sub.borrow_mut().take();
            self.downstream.on_completed();
        }
    }
}

impl<T: Clone> Observer<IndexedChangeSet<T>> for IndexedValueObservation<T> {
    fn on_next(&self, set: &IndexedChangeSet<T>) {
        if !self.live.get() {
            return;
        }
        match set.kind() {
            ChangeSetKind::Clear => self.complete(),
            ChangeSetKind::Reset | ChangeSetKind::Update => {
                let is_reset = set.kind() == ChangeSetKind::Reset;
                match (self.current)(self.index) {
                    None => self.complete(),
                    Some(value) => {
                        // Resets re-emit unconditionally; updates only when
                        // the value at the index actually changed.
                        let changed = !(self.equals)(&value, &self.last.borrow());
                        if is_reset || changed {
                            *self.last.borrow_mut() = value.clone();
                            self.downstream.on_next(&value);
                        }
                    }
                }
            }
        }
    }

    fn on_completed(&self) {
        self.complete();
    }
}

/// Observe the latest value at `index`. Deferred while notifications are
/// suspended; completes immediately when the index is out of bounds.
pub(crate) fn observe_indexed_value<C, T>(
    core: &Rc<SubjectCore<C>>,
    index: usize,
    downstream: Rc<dyn Observer<T>>,
    equals: EqualsFn<T>,
    current: Rc<dyn Fn(&C, usize) -> Option<T>>,
) -> Subscription
where
    C: ChangeTracking<Changes = IndexedChangeSet<T>> + 'static,
    T: Clone + 'static,
{
    if core.is_disposed() {
        downstream.on_completed();
        return Subscription::empty();
    }

    if core.is_suspended() {
        let slot = SubscriptionSlot::new();
        let weak = Rc::downgrade(core);
        let filler = slot.clone();
        core.defer(Box::new(move || {
            if let Some(core) = weak.upgrade() {
                if !filler.is_cancelled() {
                    filler.fill(attach_indexed(&core, index, downstream, equals, current));
                }
            }
        }));
        return slot.into_subscription();
    }

    attach_indexed(core, index, downstream, equals, current)
}

fn attach_indexed<C, T>(
    core: &Rc<SubjectCore<C>>,
    index: usize,
    downstream: Rc<dyn Observer<T>>,
    equals: EqualsFn<T>,
    current: Rc<dyn Fn(&C, usize) -> Option<T>>,
) -> Subscription
where
    C: ChangeTracking<Changes = IndexedChangeSet<T>> + 'static,
    T: Clone + 'static,
{
    core.enable_change_collection();

    let value = current(&*core.collection().borrow(), index);
    let Some(value) = value else {
        downstream.on_completed();
        return Subscription::empty();
    };
    downstream.on_next(&value);

    let weak = Rc::downgrade(core);
    let read_current: Box<dyn Fn(usize) -> Option<T>> = Box::new(move |at| {
        weak.upgrade()
            .and_then(|core| current(&*core.collection().borrow(), at))
    });

    let observation = Rc::new(IndexedValueObservation {
        index,
        last: RefCell::new(value),
        equals,
        downstream,
        current: read_current,
        live: Cell::new(true),
        sub: RefCell::new(None),
    });
    let sub = core.attach_observer(observation.clone());
    *observation.sub.borrow_mut() = Some(sub);

    let handle = observation;
    Subscription::new(move || handle.cancel())
}
