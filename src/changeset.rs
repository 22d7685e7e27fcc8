//! Stage values: positions and changesets
//!
//! A [`Changeset`] is one atomic batch of operations plus the full list
//! snapshot that holds once the batch is applied. Positions are only valid
//! against the snapshot of the stage before it (or the source list for the
//! first stage).

use std::fmt;

use crate::error::{Operation, StageError, StageResult};
use crate::macros::impl_variant_predicates;

// =============================================================================
// Positions
// =============================================================================

/// Position of an element, tagged with the section it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ElementPath {
    pub element: usize,
    pub section: usize,
}

impl ElementPath {
    #[inline]
    pub const fn new(element: usize, section: usize) -> Self {
        Self { element, section }
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[element: {}, section: {}]", self.element, self.section)
    }
}

/// A move from a position in the previous snapshot to a position in the
/// stage snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovedPath {
    pub source: ElementPath,
    pub target: ElementPath,
}

impl MovedPath {
    #[inline]
    pub const fn new(source: ElementPath, target: ElementPath) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for MovedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

// =============================================================================
// StageKind
// =============================================================================

/// Which of the three stages a changeset is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// In-place content updates, shape unchanged.
    Update,
    /// Deletions only, relative order unchanged.
    Delete,
    /// Insertions and moves reaching the final shape.
    InsertMove,
}

impl StageKind {
    impl_variant_predicates!(update, delete, insert_move);
}

// =============================================================================
// Changeset
// =============================================================================

/// One stage of a staged diff.
#[derive(Clone, PartialEq, Eq)]
pub struct Changeset<T> {
    pub kind: StageKind,
    /// The list as it looks after this stage.
    pub data: Vec<T>,
    /// Positions in the previous snapshot.
    pub element_deleted: Vec<ElementPath>,
    /// Positions in `data`.
    pub element_inserted: Vec<ElementPath>,
    /// Positions in the previous snapshot for an update stage, in `data`
    /// when updates ride along with insertions and moves.
    pub element_updated: Vec<ElementPath>,
    /// Previous snapshot position → position in `data`.
    pub element_moved: Vec<MovedPath>,
}

impl<T> Changeset<T> {
    /// An empty changeset of the given kind.
    pub fn new(kind: StageKind, data: Vec<T>) -> Self {
        Self {
            kind,
            data,
            element_deleted: Vec::new(),
            element_inserted: Vec::new(),
            element_updated: Vec::new(),
            element_moved: Vec::new(),
        }
    }

    pub fn with_deleted(mut self, deleted: Vec<ElementPath>) -> Self {
        self.element_deleted = deleted;
        self
    }

    pub fn with_inserted(mut self, inserted: Vec<ElementPath>) -> Self {
        self.element_inserted = inserted;
        self
    }

    pub fn with_updated(mut self, updated: Vec<ElementPath>) -> Self {
        self.element_updated = updated;
        self
    }

    pub fn with_moved(mut self, moved: Vec<MovedPath>) -> Self {
        self.element_moved = moved;
        self
    }

    /// Total number of operations in this stage.
    pub fn change_count(&self) -> usize {
        self.element_deleted.len()
            + self.element_inserted.len()
            + self.element_updated.len()
            + self.element_moved.len()
    }

    pub fn has_changes(&self) -> bool {
        self.change_count() > 0
    }

    /// Check that every position is addressable from a view of `view_len`
    /// elements and that the result has the shape of `data`.
    pub fn validate(&self, view_len: usize) -> StageResult<()> {
        let mut deleted = vec![false; view_len];
        for path in &self.element_deleted {
            claim(&mut deleted, path.element, Operation::Delete)?;
        }

        let remaining = view_len - self.element_deleted.len();
        let mut moved_from = vec![false; remaining];
        let mut filled = vec![false; self.data.len()];
        for moved in &self.element_moved {
            claim(&mut moved_from, moved.source.element, Operation::MoveSource)?;
            claim(&mut filled, moved.target.element, Operation::MoveTarget)?;
        }
        for path in &self.element_inserted {
            claim(&mut filled, path.element, Operation::Insert)?;
        }

        let found = remaining + self.element_inserted.len();
        if found != self.data.len() {
            return Err(StageError::LengthMismatch {
                expected: self.data.len(),
                found,
            });
        }

        if let Some(path) = self.element_updated.iter().find(|p| p.element >= found) {
            return Err(StageError::out_of_bounds(Operation::Update, path.element, found));
        }

        Ok(())
    }
}

impl<T: Clone> Changeset<T> {
    /// Apply this stage to `view`, which must hold the previous snapshot.
    ///
    /// Order: deletions, then moves and insertions (elements that neither
    /// moved nor were deleted fill the remaining slots in their current
    /// order), then updates copied from `data`.
    ///
    /// Positions are validated first. On error `view` is left untouched.
    /// Sections are not checked.
    pub fn apply_to(&self, view: &mut Vec<T>) -> StageResult<()> {
        self.validate(view.len())?;

        if !self.element_deleted.is_empty() {
            let mut doomed = vec![false; view.len()];
            for path in &self.element_deleted {
                doomed[path.element] = true;
            }
            let mut index = 0;
            view.retain(|_| {
                let keep = !doomed[index];
                index += 1;
                keep
            });
        }

        if !self.element_inserted.is_empty() || !self.element_moved.is_empty() {
            let mut previous: Vec<Option<T>> = std::mem::take(view).into_iter().map(Some).collect();
            let mut slots: Vec<Option<T>> = vec![None; self.data.len()];

            for moved in &self.element_moved {
                slots[moved.target.element] = previous[moved.source.element].take();
            }
            for path in &self.element_inserted {
                slots[path.element] = Some(self.data[path.element].clone());
            }

            let mut unmoved = previous.into_iter().flatten();
            view.extend(slots.into_iter().filter_map(|slot| slot.or_else(|| unmoved.next())));
        }

        for path in &self.element_updated {
            view[path.element] = self.data[path.element].clone();
        }

        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for Changeset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Changeset");
        s.field("kind", &self.kind).field("data", &self.data);
        if !self.element_deleted.is_empty() {
            s.field("element_deleted", &self.element_deleted);
        }
        if !self.element_inserted.is_empty() {
            s.field("element_inserted", &self.element_inserted);
        }
        if !self.element_updated.is_empty() {
            s.field("element_updated", &self.element_updated);
        }
        if !self.element_moved.is_empty() {
            s.field("element_moved", &self.element_moved);
        }
        s.finish()
    }
}

fn claim(taken: &mut [bool], index: usize, operation: Operation) -> StageResult<()> {
    match taken.get_mut(index) {
        None => Err(StageError::out_of_bounds(operation, index, taken.len())),
        Some(true) => Err(StageError::DuplicatePosition { operation, index }),
        Some(slot) => {
            *slot = true;
            Ok(())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
