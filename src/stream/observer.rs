// ============================================================================
// ripple-collections - Observer
// ============================================================================

use std::rc::Rc;

use crate::core::error::CollectionError;

/// Receives the elements of a stream.
///
/// Values arrive by reference because a topic multicasts one value to every
/// observer. After `on_error` or `on_completed`, no further callbacks are
/// delivered.
pub trait Observer<T> {
    fn on_next(&self, value: &T);

    fn on_error(&self, _error: &CollectionError) {}

    fn on_completed(&self) {}
}

// =============================================================================
// CLOSURE ADAPTERS
// =============================================================================

struct FnObserver<T> {
    next: Box<dyn Fn(&T)>,
    completed: Option<Box<dyn Fn()>>,
}

impl<T> Observer<T> for FnObserver<T> {
    fn on_next(&self, value: &T) {
        (self.next)(value);
    }

    fn on_completed(&self) {
        if let Some(completed) = &self.completed {
            completed();
        }
    }
}

/// Wrap a closure as an [`Observer`] that only cares about values.
///
/// # Example
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use ripple_collections::stream::{observer_fn, Topic};
///
/// let seen: Rc<RefCell<Vec<i32>>> = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
///
/// let topic = Topic::new();
/// let _sub = topic.subscribe(observer_fn(move |v: &i32| sink.borrow_mut().push(*v)));
/// topic.emit(&1);
/// topic.emit(&2);
///
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub fn observer_fn<T: 'static>(next: impl Fn(&T) + 'static) -> Rc<dyn Observer<T>> {
    Rc::new(FnObserver {
        next: Box::new(next),
        completed: None,
    })
}

/// Wrap a value closure and a completion closure as an [`Observer`].
pub fn observer_fn_completed<T: 'static>(
    next: impl Fn(&T) + 'static,
    completed: impl Fn() + 'static,
) -> Rc<dyn Observer<T>> {
    Rc::new(FnObserver {
        next: Box::new(next),
        completed: Some(Box::new(completed)),
    })
}

// =============================================================================
// TESTS
// =============================================================================
