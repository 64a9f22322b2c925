// ============================================================================
// ripple-collections - Observable Change-Tracking Collections
// ============================================================================
//
// Mutable collections (distinct set, keyed map, keyed cache, indexed list)
// that record each atomic mutation, batch them into classified change sets,
// and publish them to subscribers as synchronous push streams. Downstream
// operators can transform those streams into other reactive collections,
// enabling dynamic views over mutable data.
//
// Single-threaded cooperative by design: nothing here is thread-safe, and
// observer callbacks run on the caller's thread before the mutating method
// returns.
// ============================================================================

pub mod changes;
pub mod core;
pub mod facades;
pub mod stream;
pub mod subjects;
pub mod tracking;

// Re-export the working surface at the crate root.
pub use changes::{
    AtomicChange, ChangeSet, ChangeSetBuilder, ChangeSetKind, DistinctChange, DistinctChangeSet,
    IndexedChange, IndexedChangeSet, KeyedChange, KeyedChangeSet,
};
pub use crate::core::equality::{
    always_equals, by_field, default_equals, equals, never_equals, safe_equals_f32,
    safe_equals_f64, EqualsFn,
};
pub use crate::core::error::{CollectionError, VariantError};
pub use facades::{
    ExtendedCache, ExtendedList, ExtendedMap, ExtendedSet, ObservableList, ObservableMap,
    ObservableSet, ReadableList, ReadableMap, ReadableSet,
};
pub use stream::{observer_fn, observer_fn_completed, Observer, Subscription, Topic};
pub use subjects::{SubjectCache, SubjectDictionary, SubjectList, SubjectSet, SuspensionGuard};
pub use tracking::{
    ChangeTracking, ChangeTrackingCache, ChangeTrackingDictionary, ChangeTrackingList,
    ChangeTrackingSet,
};

// =============================================================================
// TESTS
// =============================================================================
