// ============================================================================
// ripple-collections - KeyedChange
// Atomic changes against a keyed map or cache
// ============================================================================

use crate::core::error::VariantError;

use super::AtomicChange;

/// A single mutation of a keyed collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyedChange<K, V> {
    /// `item` was inserted under `key`.
    Addition { key: K, item: V },
    /// The entry under `key` (holding `item`) was deleted.
    Removal { key: K, item: V },
    /// The entry under `key` changed from `old_item` to `new_item`.
    Replacement { key: K, old_item: V, new_item: V },
}

impl<K, V> KeyedChange<K, V> {
    pub fn is_addition(&self) -> bool {
        matches!(self, Self::Addition { .. })
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, Self::Removal { .. })
    }

    pub fn is_replacement(&self) -> bool {
        matches!(self, Self::Replacement { .. })
    }

    /// Name of the stored variant, for diagnostics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Addition { .. } => "Addition",
            Self::Removal { .. } => "Removal",
            Self::Replacement { .. } => "Replacement",
        }
    }

    /// The key the change applies to, whichever variant it is.
    pub fn key(&self) -> &K {
        match self {
            Self::Addition { key, .. }
            | Self::Removal { key, .. }
            | Self::Replacement { key, .. } => key,
        }
    }

    /// Key and inserted item, or a [`VariantError`] for non-additions.
    pub fn added(&self) -> Result<(&K, &V), VariantError> {
        match self {
            Self::Addition { key, item } => Ok((key, item)),
            other => Err(VariantError::new("Addition", other.variant_name())),
        }
    }

    /// Key and deleted item, or a [`VariantError`] for non-removals.
    pub fn removed(&self) -> Result<(&K, &V), VariantError> {
        match self {
            Self::Removal { key, item } => Ok((key, item)),
            other => Err(VariantError::new("Removal", other.variant_name())),
        }
    }

    /// Key, old item, and new item, or a [`VariantError`] for
    /// non-replacements.
    pub fn replaced(&self) -> Result<(&K, &V, &V), VariantError> {
        match self {
            Self::Replacement {
                key,
                old_item,
                new_item,
            } => Ok((key, old_item, new_item)),
            other => Err(VariantError::new("Replacement", other.variant_name())),
        }
    }

    /// The item the collection holds after this change, if any.
    /// Removals yield `None`.
    pub fn current_item(&self) -> Option<&V> {
        match self {
            Self::Addition { item, .. } => Some(item),
            Self::Replacement { new_item, .. } => Some(new_item),
            Self::Removal { .. } => None,
        }
    }
}

impl<K, V> AtomicChange for KeyedChange<K, V> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        let add = KeyedChange::Addition { key: "a", item: 1 };
        let rem = KeyedChange::Removal { key: "a", item: 1 };
        let rep = KeyedChange::Replacement {
            key: "a",
            old_item: 1,
            new_item: 2,
        };

        assert!(add.is_addition() && add.is_insertion() && !add.is_removal());
        assert!(rem.is_removal() && !rem.is_insertion());
        assert!(rep.is_replacement() && !rep.is_insertion() && !rep.is_removal());
    }

    #[test]
    fn key_accessor() {
        let rep = KeyedChange::Replacement {
            key: "k",
            old_item: 1,
            new_item: 2,
        };
        assert_eq!(*rep.key(), "k");
    }

    #[test]
    fn typed_accessors() {
        let add = KeyedChange::Addition { key: "a", item: 1 };
        assert_eq!(add.added(), Ok((&"a", &1)));
        assert_eq!(
            add.replaced(),
            Err(VariantError::new("Replacement", "Addition"))
        );

        let rep = KeyedChange::Replacement {
            key: "a",
            old_item: 1,
            new_item: 2,
        };
        assert_eq!(rep.replaced(), Ok((&"a", &1, &2)));
        assert!(rep.removed().is_err());
    }

    #[test]
    fn current_item() {
        let add = KeyedChange::Addition { key: "a", item: 1 };
        let rem = KeyedChange::Removal { key: "a", item: 1 };
        let rep = KeyedChange::Replacement {
            key: "a",
            old_item: 1,
            new_item: 2,
        };

        assert_eq!(add.current_item(), Some(&1));
        assert_eq!(rem.current_item(), None);
        assert_eq!(rep.current_item(), Some(&2));
    }
}
