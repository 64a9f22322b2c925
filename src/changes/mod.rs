// ============================================================================
// ripple-collections - Change Algebra
// Atomic change variants, classified change sets, and the batch builder
// ============================================================================

mod builder;
mod change_set;
mod distinct;
mod indexed;
mod keyed;

pub use builder::ChangeSetBuilder;
pub use change_set::{ChangeSet, ChangeSetKind, DistinctChangeSet, IndexedChangeSet, KeyedChangeSet};
pub use distinct::DistinctChange;
pub use indexed::IndexedChange;
pub use keyed::KeyedChange;

// =============================================================================
// ATOMIC CHANGE TRAIT
// =============================================================================

/// Classification hooks shared by every atomic change family.
///
/// The builder only needs to know whether a change removes an element or
/// inserts one; everything else about the variant stays family-specific.
pub trait AtomicChange {
    /// True for removal variants.
    fn is_removal(&self) -> bool;

    /// True for variants that insert a new element (additions/insertions).
    /// Replacements, movements, and combined updates are neither removals
    /// nor insertions.
    fn is_insertion(&self) -> bool;
}
