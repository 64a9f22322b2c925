// ============================================================================
// ripple-collections - IndexedChange
// Atomic changes against an index-ordered list
// ============================================================================
//
// Indices in each change are valid against the list state produced by the
// changes before it in the same batch. Engines emitting several removals
// from one operation therefore list them in descending index order, and
// several insertions in ascending order.
// ============================================================================

use crate::core::error::VariantError;

use super::AtomicChange;

/// A single mutation of an index-ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexedChange<T> {
    /// `item` was inserted at `index`; later elements shifted right.
    Insertion { index: usize, item: T },
    /// The element at `index` (holding `item`) was deleted; later elements
    /// shifted left.
    Removal { index: usize, item: T },
    /// `item` moved from `old_index` to `new_index`.
    Movement {
        old_index: usize,
        new_index: usize,
        item: T,
    },
    /// The element at `index` changed from `old_item` to `new_item`.
    Replacement {
        index: usize,
        old_item: T,
        new_item: T,
    },
    /// Combined replace-and-move: `old_item` at `old_index` became
    /// `new_item` at `new_index`.
    Update {
        old_index: usize,
        old_item: T,
        new_index: usize,
        new_item: T,
    },
}

impl<T> IndexedChange<T> {
    pub fn is_insertion(&self) -> bool {
        matches!(self, Self::Insertion { .. })
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    pub fn is_movement(&self) -> bool {
        matches!(self, Self::Movement { .. })
    }

    pub fn is_replacement(&self) -> bool {
        matches!(self, Self::Replacement { .. })
    }

    /// Name of the stored variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Insertion { .. } => "Insertion",
            Self::Removal { .. } => "Removal",
            Self::Movement { .. } => "Movement",
            Self::Replacement { .. } => "Replacement",
            Self::Update { .. } => "Update",
        }
    }

    /// Index and inserted item, or a [`VariantError`] for non-insertions.
    pub fn inserted(&self) -> Result<(usize, &T), VariantError> {
        match self {
            Self::Insertion { index, item } => Ok((*index, item)),
            other => Err(VariantError::new("Insertion", other.variant_name())),
        }
    }

    /// Index and deleted item, or a [`VariantError`] for non-removals.
    pub fn removed(&self) -> Result<(usize, &T), VariantError> {
        match self {
            Self::Removal { index, item } => Ok((*index, item)),
            other => Err(VariantError::new("Removal", other.variant_name())),
        }
    }

    /// Old index, new index, and item, or a [`VariantError`] for
    /// non-movements.
    pub fn moved(&self) -> Result<(usize, usize, &T), VariantError> {
        match self {
            Self::Movement {
                old_index,
                new_index,
                item,
            } => Ok((*old_index, *new_index, item)),
            other => Err(VariantError::new("Movement", other.variant_name())),
        }
    }

    /// Index, old item, and new item, or a [`VariantError`] for
    /// non-replacements.
    pub fn replaced(&self) -> Result<(usize, &T, &T), VariantError> {
        match self {
            Self::Replacement {
                index,
                old_item,
                new_item,
            } => Ok((*index, old_item, new_item)),
            other => Err(VariantError::new("Replacement", other.variant_name())),
        }
    }
}

impl<T> AtomicChange for IndexedChange<T> {
    fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    fn is_insertion(&self) -> bool {
        matches!(self, Self::Insertion { .. })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        let ins = IndexedChange::Insertion { index: 0, item: 1 };
        let rem = IndexedChange::Removal { index: 0, item: 1 };
        let mov = IndexedChange::Movement {
            old_index: 0,
            new_index: 2,
            item: 1,
        };
        let rep = IndexedChange::Replacement {
            index: 0,
            old_item: 1,
            new_item: 2,
        };
        let upd = IndexedChange::Update {
            old_index: 0,
            old_item: 1,
            new_index: 1,
            new_item: 2,
        };

        assert!(ins.is_insertion() && !ins.is_removal());
        assert!(rem.is_removal() && !rem.is_insertion());
        assert!(mov.is_movement() && !mov.is_insertion() && !mov.is_removal());
        assert!(rep.is_replacement() && !rep.is_insertion());
        assert!(!upd.is_insertion() && !upd.is_removal());
    }

    #[test]
    fn typed_accessors() {
        let ins = IndexedChange::Insertion { index: 3, item: 'x' };
        assert_eq!(ins.inserted(), Ok((3, &'x')));
        assert_eq!(
            ins.removed(),
            Err(VariantError::new("Removal", "Insertion"))
        );

        let mov = IndexedChange::Movement {
            old_index: 1,
            new_index: 4,
            item: 'y',
        };
        assert_eq!(mov.moved(), Ok((1, 4, &'y')));
        assert!(mov.replaced().is_err());

        let rep = IndexedChange::Replacement {
            index: 2,
            old_item: 'a',
            new_item: 'b',
        };
        assert_eq!(rep.replaced(), Ok((2, &'a', &'b')));
    }
}
