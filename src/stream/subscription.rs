// ============================================================================
// ripple-collections - Subscription
// Drop-based stream teardown
// ============================================================================

/// Handle for an active stream subscription.
///
/// The teardown runs exactly once, on [`Subscription::unsubscribe`] or on
/// drop, whichever comes first. Dropping the handle is the ordinary way to
/// detach an observer; holding it keeps the observer attached.
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to tear down, handed out when the stream
    /// has already completed.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Detach now instead of at scope exit.
    pub fn unsubscribe(self) {
        // Drop runs the teardown.
    }

    /// True while a teardown is pending.
    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
