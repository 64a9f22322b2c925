// ============================================================================
// ripple-collections - Change-Tracking Engines
// Mutable collections that record each mutation as an atomic change
// ============================================================================
//
// Every engine owns its backing container, an injected equality relation,
// a ChangeSetBuilder buffer, and two flags: `collect_changes` and `dirty`.
// While collection is disabled the builder is bypassed entirely but storage
// mutations and the dirty flag proceed as usual.
// ============================================================================

mod cache;
mod dictionary;
mod list;
mod set;

pub use cache::ChangeTrackingCache;
pub use dictionary::ChangeTrackingDictionary;
pub use list::ChangeTrackingList;
pub use set::ChangeTrackingSet;

// =============================================================================
// CHANGE TRACKING TRAIT
// =============================================================================

/// Capture surface shared by every engine, used by the subject wrappers.
pub trait ChangeTracking {
    /// The change-set family this engine produces.
    type Changes: 'static;

    /// True iff at least one state-changing operation has occurred since
    /// construction or the last capture.
    fn is_dirty(&self) -> bool;

    fn is_change_collection_enabled(&self) -> bool;

    /// Enable or disable change collection. Disabling discards any buffered
    /// changes; re-enabling starts a fresh empty buffer.
    fn set_change_collection(&mut self, enabled: bool);

    /// Emit the buffered change set (empty while collection is disabled)
    /// and clear the dirty flag.
    fn capture_changes_and_clean(&mut self) -> Self::Changes;

    /// Synthesise a change set describing the full current contents: one
    /// addition/insertion per element, applied to an empty collection it
    /// yields the current state. Used for subscription-time snapshots.
    fn snapshot_changes(&self) -> Self::Changes;
}
