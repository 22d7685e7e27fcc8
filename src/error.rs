//! Error types for staged-diff.
//!
//! Diffing never fails. Errors only come from applying a changeset to a
//! view that does not match the snapshot the changeset was computed against.

use thiserror::Error;

/// Operation group a rejected position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delete,
    Insert,
    Update,
    MoveSource,
    MoveTarget,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Delete => "delete",
            Self::Insert => "insert",
            Self::Update => "update",
            Self::MoveSource => "move source",
            Self::MoveTarget => "move target",
        })
    }
}

/// Errors raised when applying a changeset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// A position is past the end of the list it addresses.
    #[error("{operation} position {index} out of bounds for length {len}")]
    OutOfBounds {
        operation: Operation,
        index: usize,
        len: usize,
    },

    /// Two operations address the same slot.
    #[error("{operation} position {index} is addressed more than once")]
    DuplicatePosition { operation: Operation, index: usize },

    /// The view length after applying does not match the stage snapshot.
    #[error("view length mismatch: stage expects {expected}, view would have {found}")]
    LengthMismatch { expected: usize, found: usize },
}

/// Result type alias for applying changesets.
pub type StageResult<T> = Result<T, StageError>;

impl StageError {
    pub(crate) fn out_of_bounds(operation: Operation, index: usize, len: usize) -> Self {
        Self::OutOfBounds {
            operation,
            index,
            len,
        }
    }
}
