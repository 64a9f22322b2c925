// ============================================================================
// ripple-collections - SuspensionGuard
// Scoped notification suspension
// ============================================================================

/// Scoped handle for a notification suspension.
///
/// Dropping the guard (on any exit path, including panic unwinding) ends
/// the suspension; when the last outstanding guard of a subject is
/// released, accumulated changes flush as a single batch.
pub struct SuspensionGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl SuspensionGuard {
    pub(crate) fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// End the suspension now instead of at scope exit.
    pub fn release(self) {
        // Drop runs the release closure.
    }
}

impl Drop for SuspensionGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for SuspensionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuspensionGuard").finish()
    }
}
