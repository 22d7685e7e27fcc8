//! Algorithm implementations.
//!
//! - `diff`: linear identity-matching diff (classification)
//! - `occurrence`: identifier index and target → source binding
//! - `hash`: deterministic hashing utilities

mod diff;
mod hash;
mod occurrence;

pub use diff::{
    differentiate, DiffConfig, DiffObserver, DiffResult, DiffStats, SurplusTarget, Trace,
    TracingObserver, UpdatedIndex,
};
pub use hash::StableHasher;
pub use occurrence::{DuplicateQueue, Occurrence, OccurrenceTable};
