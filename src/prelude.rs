//! Prelude for common imports.
//!
//! ```
//! use staged_diff::prelude::*;
//! ```

// Identity
pub use crate::id::{Differentiable, Keyed, StableId};

// Algorithms
pub use crate::algo::{
    differentiate, DiffConfig, DiffObserver, DiffResult, DiffStats, SurplusTarget,
    TracingObserver, UpdatedIndex,
};

// Changesets
pub use crate::changeset::{Changeset, ElementPath, MovedPath, StageKind};
pub use crate::staged::{diff_sections, StagedChangeset};

// Error
pub use crate::error::{StageError, StageResult};
