// ============================================================================
// ripple-collections - Topic
// A synchronous multicast stream
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::core::error::CollectionError;

use super::observer::Observer;
use super::subscription::Subscription;

struct Entry<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    observer: Rc<dyn Observer<T>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            observer: self.observer.clone(),
        }
    }
}

struct TopicCore<T> {
    observers: RefCell<Vec<Entry<T>>>,
    completed: Cell<bool>,
    next_id: Cell<u64>,
}

/// A push-based multicast stream delivering values synchronously on the
/// caller's thread.
///
/// `Topic` is a cheap-clone handle; clones share the observer list.
/// Emission iterates a snapshot of the observer list and honours per-entry
/// liveness, so observers may subscribe, unsubscribe, or complete the topic
/// from inside a callback. Subscription teardowns hold only a weak
/// reference to the topic, so an outstanding [`Subscription`] never keeps
/// the stream's owner alive.
pub struct Topic<T> {
    core: Rc<TopicCore<T>>,
}

impl<T> Clone for Topic<T> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: 'static> Topic<T> {
    pub fn new() -> Self {
        Self {
            core: Rc::new(TopicCore {
                observers: RefCell::new(Vec::new()),
                completed: Cell::new(false),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Attach an observer. On a completed topic the observer is completed
    /// immediately and an inert subscription is returned.
    pub fn subscribe(&self, observer: Rc<dyn Observer<T>>) -> Subscription {
        if self.core.completed.get() {
            observer.on_completed();
            return Subscription::empty();
        }

        let id = self.core.next_id.get();
        self.core.next_id.set(id + 1);

        let active = Rc::new(Cell::new(true));
        self.core.observers.borrow_mut().push(Entry {
            id,
            active: active.clone(),
            observer,
        });

        let weak: Weak<TopicCore<T>> = Rc::downgrade(&self.core);
        Subscription::new(move || {
            active.set(false);
            if let Some(core) = weak.upgrade() {
                core.observers.borrow_mut().retain(|e| e.id != id);
            }
        })
    }

    /// Deliver `value` to every live observer.
    pub fn emit(&self, value: &T) {
        if self.core.completed.get() {
            return;
        }

        // Snapshot first: callbacks may mutate the observer list.
        let snapshot: Vec<Entry<T>> = self.core.observers.borrow().clone();
        for entry in snapshot {
            if self.core.completed.get() {
                break;
            }
            if entry.active.get() {
                entry.observer.on_next(value);
            }
        }
    }

    /// Terminate the stream with an error. Observers are detached after the
    /// `on_error` callback.
    pub fn error(&self, error: &CollectionError) {
        if self.core.completed.get() {
            return;
        }
        self.core.completed.set(true);

        let drained: Vec<Entry<T>> = self.core.observers.borrow_mut().drain(..).collect();
        for entry in drained {
            if entry.active.get() {
                entry.observer.on_error(error);
            }
        }
    }

    /// Complete the stream. Observers are detached after the `on_completed`
    /// callback; later subscribers complete immediately.
    pub fn complete(&self) {
        if self.core.completed.get() {
            return;
        }
        self.core.completed.set(true);

        let drained: Vec<Entry<T>> = self.core.observers.borrow_mut().drain(..).collect();
        for entry in drained {
            if entry.active.get() {
                entry.observer.on_completed();
            }
        }
    }

    pub fn observer_count(&self) -> usize {
        self.core
            .observers
            .borrow()
            .iter()
            .filter(|e| e.active.get())
            .count()
    }

    pub fn has_observers(&self) -> bool {
        self.observer_count() > 0
    }

    pub fn is_completed(&self) -> bool {
        self.core.completed.get()
    }
}

impl<T: 'static> Default for Topic<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{observer_fn, observer_fn_completed};

    #[test]
    fn emit_reaches_every_observer() {
        let topic: Topic<i32> = Topic::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let a = seen.clone();
        let _sub_a = topic.subscribe(observer_fn(move |v: &i32| a.borrow_mut().push(('a', *v))));
        let b = seen.clone();
        let _sub_b = topic.subscribe(observer_fn(move |v: &i32| b.borrow_mut().push(('b', *v))));

        topic.emit(&1);

        assert_eq!(*seen.borrow(), vec![('a', 1), ('b', 1)]);
    }

    #[test]
    fn dropping_subscription_detaches() {
        let topic: Topic<i32> = Topic::new();
        let count = Rc::new(Cell::new(0));

        let counter = count.clone();
        let sub = topic.subscribe(observer_fn(move |_: &i32| counter.set(counter.get() + 1)));

        topic.emit(&1);
        assert_eq!(count.get(), 1);
        assert_eq!(topic.observer_count(), 1);

        drop(sub);
        assert_eq!(topic.observer_count(), 0);

        topic.emit(&2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn complete_notifies_and_detaches() {
        let topic: Topic<i32> = Topic::new();
        let done = Rc::new(Cell::new(false));

        let flag = done.clone();
        let _sub = topic.subscribe(observer_fn_completed(|_: &i32| {}, move || flag.set(true)));

        topic.complete();
        assert!(done.get());
        assert!(topic.is_completed());
        assert_eq!(topic.observer_count(), 0);

        // Emissions after completion are dropped.
        topic.emit(&1);
    }

    #[test]
    fn subscribing_after_completion_completes_immediately() {
        let topic: Topic<i32> = Topic::new();
        topic.complete();

        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        let sub = topic.subscribe(observer_fn_completed(|_: &i32| {}, move || flag.set(true)));

        assert!(done.get());
        assert!(!sub.is_active());
    }

    #[test]
    fn error_is_terminal() {
        let topic: Topic<i32> = Topic::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        struct Recorder {
            seen: Rc<RefCell<Vec<String>>>,
        }
        impl Observer<i32> for Recorder {
            fn on_next(&self, v: &i32) {
                self.seen.borrow_mut().push(format!("next:{v}"));
            }
            fn on_error(&self, e: &CollectionError) {
                self.seen.borrow_mut().push(format!("error:{e}"));
            }
            fn on_completed(&self) {
                self.seen.borrow_mut().push("completed".into());
            }
        }

        let _sub = topic.subscribe(Rc::new(Recorder { seen: seen.clone() }));
        topic.emit(&1);
        topic.error(&CollectionError::KeyNotFound);
        topic.emit(&2);

        assert_eq!(*seen.borrow(), vec!["next:1", "error:key not found"]);
        assert!(topic.is_completed());
    }

    #[test]
    fn observer_may_unsubscribe_during_emit() {
        let topic: Topic<i32> = Topic::new();
        let count = Rc::new(Cell::new(0));

        // The subscription is stashed so the observer can drop it from
        // inside its own callback.
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let counter = count.clone();
        let slot_clone = slot.clone();
        let sub = topic.subscribe(observer_fn(move |_: &i32| {
            counter.set(counter.get() + 1);
            slot_clone.borrow_mut().take();
        }));
        *slot.borrow_mut() = Some(sub);

        topic.emit(&1);
        topic.emit(&2);

        assert_eq!(count.get(), 1);
        assert_eq!(topic.observer_count(), 0);
    }

    #[test]
    fn observer_may_subscribe_during_emit_without_seeing_current_value() {
        let topic: Topic<i32> = Topic::new();
        let late_seen = Rc::new(RefCell::new(Vec::new()));
        let late_subs: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let topic_clone = topic.clone();
        let sink = late_seen.clone();
        let subs = late_subs.clone();
        let _sub = topic.subscribe(observer_fn(move |_: &i32| {
            let s = sink.clone();
            let sub = topic_clone.subscribe(observer_fn(move |v: &i32| s.borrow_mut().push(*v)));
            subs.borrow_mut().push(sub);
        }));

        topic.emit(&1);
        assert!(late_seen.borrow().is_empty());

        topic.emit(&2);
        assert_eq!(*late_seen.borrow(), vec![2]);
    }

    #[test]
    fn subscription_outliving_topic_is_harmless() {
        let sub;
        {
            let topic: Topic<i32> = Topic::new();
            sub = topic.subscribe(observer_fn(|_: &i32| {}));
        }
        drop(sub); // teardown upgrades a dead weak ref and no-ops
    }
}
