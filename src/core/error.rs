// ============================================================================
// ripple-collections - Errors
// ============================================================================

use thiserror::Error;

// =============================================================================
// COLLECTION ERRORS
// =============================================================================

/// Errors raised by fallible collection operations.
///
/// Every fallible operation validates before mutating: when an error is
/// returned, the collection, its builder buffer, and its dirty flag are
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// `try_insert` was called with a key that is already present.
    #[error("key is already present")]
    DuplicateKey,

    /// `try_get` was called with a key that is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A list index was outside the valid range for the operation.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A list range did not fit inside the collection.
    #[error("range of {count} starting at {index} exceeds length {len}")]
    InvalidRange {
        index: usize,
        count: usize,
        len: usize,
    },
}

// =============================================================================
// VARIANT ERRORS
// =============================================================================

/// Returned by typed change accessors when the underlying variant does not
/// match the accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected {expected} change, found {actual}")]
pub struct VariantError {
    /// Variant the accessor expected.
    pub expected: &'static str,
    /// Variant actually stored.
    pub actual: &'static str,
}

impl VariantError {
    pub fn new(expected: &'static str, actual: &'static str) -> Self {
        Self { expected, actual }
    }
}

// =============================================================================
// TESTS
// =============================================================================
