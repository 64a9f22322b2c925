// ============================================================================
// ripple-collections - ChangeSetBuilder
// Accumulates atomic changes and classifies the batch automatically
// ============================================================================
//
// Classification automaton:
//
//   add_change(c):
//     c not a removal            -> has_non_removals = true
//     kind in {Clear, Reset} and c is an insertion -> kind = Reset
//     otherwise                  -> kind = Update
//
//   on_source_cleared():
//     has_non_removals == false  -> kind = Clear
//
// This lets per-operation callers emit the right tag without re-scanning
// the buffered changes. The builder performs no semantic validation; the
// surrounding collection is responsible for a coherent sequence.
// ============================================================================

use super::{AtomicChange, ChangeSet, ChangeSetKind};

/// Accumulates atomic changes of one family and produces the corresponding
/// [`ChangeSet`] on demand.
#[derive(Debug, Clone)]
pub struct ChangeSetBuilder<C> {
    changes: Vec<C>,
    kind: Option<ChangeSetKind>,
    has_non_removals: bool,
}

impl<C: AtomicChange> ChangeSetBuilder<C> {
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
            kind: None,
            has_non_removals: false,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            changes: Vec::with_capacity(capacity),
            kind: None,
            has_non_removals: false,
        }
    }

    /// Append a change and update the classification state.
    pub fn add_change(&mut self, change: C) {
        if !change.is_removal() {
            self.has_non_removals = true;
        }

        self.kind = match self.kind {
            Some(ChangeSetKind::Clear) | Some(ChangeSetKind::Reset) if change.is_insertion() => {
                Some(ChangeSetKind::Reset)
            }
            _ => Some(ChangeSetKind::Update),
        };

        self.changes.push(change);
    }

    /// Signal that the last buffered mutation emptied the source collection.
    pub fn on_source_cleared(&mut self) {
        if !self.has_non_removals {
            self.kind = Some(ChangeSetKind::Clear);
        }
    }

    /// Emit the assembled change set and reset to the empty state.
    ///
    /// With an empty buffer this returns the distinguished empty change set
    /// without allocating. `reuse_buffer = true` keeps the internal
    /// allocation for the next batch; `reuse_buffer = false` transfers
    /// ownership of the buffer into the change set, which avoids a copy
    /// when the builder was pre-sized to the exact change count.
    pub fn build_and_clear(&mut self, reuse_buffer: bool) -> ChangeSet<C> {
        let kind = match self.kind.take() {
            None => return ChangeSet::empty(),
            Some(kind) => kind,
        };
        self.has_non_removals = false;

        let changes = if reuse_buffer {
            self.changes.drain(..).collect()
        } else {
            std::mem::take(&mut self.changes)
        };

        ChangeSet::new(changes, kind)
    }

    /// Drop all buffered changes and classification state.
    pub fn clear(&mut self) {
        self.changes.clear();
        self.kind = None;
        self.has_non_removals = false;
    }

    /// Reserve room for at least `additional` further changes. A sizing
    /// hint only; classification and semantics are unaffected.
    pub fn ensure_capacity(&mut self, additional: usize) {
        self.changes.reserve(additional);
    }

    pub fn capacity(&self) -> usize {
        self.changes.capacity()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<C: AtomicChange> Default for ChangeSetBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
