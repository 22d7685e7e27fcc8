//! staged-diff - Linear-time list diff packaged as safely-applicable stages
//!
//! ## Core Concepts
//!
//! **Identity vs. content**: elements are matched by a differencing
//! identifier ([`Differentiable::Id`]). Matched elements whose content
//! changed are updates, matched elements whose relative order changed are
//! moves. Everything else is a deletion or an insertion.
//!
//! **Stages**: the result is a [`StagedChangeset`], up to three
//! [`Changeset`]s (updates → deletions → insertions + moves). Each stage's
//! positions are valid against the snapshot left by the previous stage, so
//! a view can apply them one batch at a time without index corruption.
//!
//! ## Modules
//! - `id`: `Differentiable` trait, `StableId`, `Keyed`
//! - `algo`: occurrence index, classification, deterministic hashing
//! - `changeset`: positions, `Changeset`, reference applier
//! - `staged`: the stager and public entry points
//! - `error`: errors raised when applying a changeset
//!
//! ## Usage
//!
//! ```
//! use staged_diff::{Keyed, StagedChangeset};
//!
//! let source = vec![Keyed::new("a", 1), Keyed::new("b", 1), Keyed::new("c", 1)];
//! let target = vec![Keyed::new("c", 1), Keyed::new("a", 2)];
//!
//! let staged = StagedChangeset::new(&source, &target);
//! assert_eq!(staged.len(), 3); // update "a", delete "b", move "c"
//!
//! let mut view = source.clone();
//! staged.apply_to(&mut view).unwrap();
//! assert_eq!(view, target);
//! ```
//!
//! ## Features
//! - `parallel`: diff independent sections concurrently in [`diff_sections`]

// =============================================================================
// Modules
// =============================================================================

/// Helper macros
mod macros;

/// Element identity
pub mod id;

/// Algorithms: occurrence index, diff, hashing
pub mod algo;

/// Positions and changesets
pub mod changeset;

/// Staged changesets and entry points
pub mod staged;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Identity
pub use id::{Differentiable, Keyed, StableId};

// Algorithms
pub use algo::{
    differentiate, DiffConfig, DiffObserver, DiffResult, DiffStats, StableHasher, SurplusTarget,
    TracingObserver, UpdatedIndex,
};

// Changesets
pub use changeset::{Changeset, ElementPath, MovedPath, StageKind};
pub use staged::{diff_sections, StagedChangeset};

// Error types
pub use error::{Operation, StageError, StageResult};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        title: &'static str,
    }

    impl Differentiable for Row {
        type Id = u32;

        fn difference_id(&self) -> u32 {
            self.id
        }

        fn is_content_equal(&self, other: &Self) -> bool {
            self.title == other.title
        }
    }

    fn row(id: u32, title: &'static str) -> Row {
        Row { id, title }
    }

    #[test]
    fn test_custom_element_round_trip() {
        let source = vec![row(1, "one"), row(2, "two"), row(3, "three"), row(4, "four")];
        let target = vec![row(4, "four"), row(2, "TWO"), row(5, "five"), row(1, "one")];

        let staged = StagedChangeset::new(&source, &target);
        let mut view = source.clone();
        staged.apply_to(&mut view).unwrap();

        assert_eq!(view, target);
    }

    #[test]
    fn test_stable_ids_as_elements() {
        let source: Vec<StableId> = ["a", "b", "c"].iter().map(|k| StableId::from_key(k)).collect();
        let target: Vec<StableId> = ["c", "a"].iter().map(|k| StableId::from_key(k)).collect();

        let staged = StagedChangeset::new(&source, &target);
        let kinds: Vec<StageKind> = staged.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![StageKind::Delete, StageKind::InsertMove]);
    }

    #[test]
    fn test_str_elements() {
        let staged = StagedChangeset::new(&["x", "y"], &["y", "x", "z"]);
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].element_inserted, vec![ElementPath::new(2, 0)]);
        assert_eq!(staged[0].element_moved.len(), 1);
    }
}
