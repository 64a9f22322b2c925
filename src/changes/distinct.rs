// ============================================================================
// ripple-collections - DistinctChange
// Atomic changes against a distinct-element set
// ============================================================================

use crate::core::error::VariantError;

use super::AtomicChange;

/// A single mutation of a distinct-element set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistinctChange<T> {
    /// `item` was inserted into the set.
    Addition { item: T },
    /// `item` was deleted from the set.
    Removal { item: T },
}

impl<T> DistinctChange<T> {
    /// Returns `true` if this is an [`DistinctChange::Addition`].
    pub fn is_addition(&self) -> bool {
        matches!(self, Self::Addition { .. })
    }

    /// Returns `true` if this is a [`DistinctChange::Removal`].
    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    /// Name of the stored variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Addition { .. } => "Addition",
            Self::Removal { .. } => "Removal",
        }
    }

    /// The inserted item, or a [`VariantError`] if this is not an addition.
    pub fn added_item(&self) -> Result<&T, VariantError> {
        match self {
            Self::Addition { item } => Ok(item),
            other => Err(VariantError::new("Addition", other.variant_name())),
        }
    }

    /// The deleted item, or a [`VariantError`] if this is not a removal.
    pub fn removed_item(&self) -> Result<&T, VariantError> {
        match self {
            Self::Removal { item } => Ok(item),
            other => Err(VariantError::new("Removal", other.variant_name())),
        }
    }

    /// The item carried by the change, whichever variant it is.
    pub fn item(&self) -> &T {
        match self {
            Self::Addition { item } | Self::Removal { item } => item,
        }
    }
}

impl<T> AtomicChange for DistinctChange<T> {
    fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    fn is_insertion(&self) -> bool {
        matches!(self, Self::Addition { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================
