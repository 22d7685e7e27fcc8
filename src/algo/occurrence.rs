//! Occurrence index and reference resolution
//!
//! Maps each source identifier to the source position(s) it occupies, then
//! walks the target once and binds every target position to at most one
//! source position.
//!
//! # Duplicates
//!
//! - **Source side**: positions sharing an identifier are queued in source
//!   order and handed out FIFO, so the first target occurrence takes the
//!   first source occurrence.
//! - **Target side**: once every source occurrence is bound, further target
//!   occurrences stay unresolved and become insertions. They are reported to
//!   the [`DiffObserver`] but are not an error.
//!
//! # Complexity
//!
//! One pass over each sequence, O(n + m) time. The table is pre-sized to the
//! source length so building it never rehashes.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::changeset::ElementPath;
use crate::id::Differentiable;

use super::diff::{DiffObserver, SurplusTarget, Trace};

// =============================================================================
// Occurrence
// =============================================================================

/// Where an identifier occurs in the source sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occurrence {
    Unique(usize),
    Duplicate(DuplicateQueue),
}

impl Occurrence {
    /// Record another source position carrying the same identifier.
    fn record(&mut self, index: usize) {
        match self {
            Self::Unique(first) => {
                let first = *first;
                *self = Self::Duplicate(DuplicateQueue::new(first, index));
            }
            Self::Duplicate(queue) => queue.push(index),
        }
    }

    /// Number of source positions with this identifier.
    pub fn count(&self) -> usize {
        match self {
            Self::Unique(_) => 1,
            Self::Duplicate(queue) => queue.indices.len(),
        }
    }
}

/// Source positions of a duplicated identifier, consumed in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateQueue {
    indices: SmallVec<[usize; 4]>,
    cursor: usize,
}

impl DuplicateQueue {
    fn new(first: usize, second: usize) -> Self {
        let mut indices = SmallVec::new();
        indices.push(first);
        indices.push(second);
        Self { indices, cursor: 0 }
    }

    fn push(&mut self, index: usize) {
        self.indices.push(index);
    }

    /// Next unconsumed source position, or `None` once exhausted.
    fn next(&mut self) -> Option<usize> {
        let index = self.indices.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(index)
    }

    /// Positions not yet handed out.
    pub fn remaining(&self) -> &[usize] {
        &self.indices[self.cursor..]
    }
}

// =============================================================================
// OccurrenceTable
// =============================================================================

/// Identifier → source occurrence(s), borrowing the identifiers it indexes.
pub struct OccurrenceTable<'a, K> {
    table: FxHashMap<&'a K, Occurrence>,
}

impl<'a, K: std::hash::Hash + Eq> OccurrenceTable<'a, K> {
    /// Index `source_ids` in one pass.
    pub fn build(source_ids: &'a [K]) -> Self {
        let mut table: FxHashMap<&'a K, Occurrence> =
            FxHashMap::with_capacity_and_hasher(source_ids.len(), Default::default());

        for (index, id) in source_ids.iter().enumerate() {
            table
                .entry(id)
                .and_modify(|occurrence| occurrence.record(index))
                .or_insert(Occurrence::Unique(index));
        }

        Self { table }
    }

    pub fn get(&self, id: &K) -> Option<&Occurrence> {
        self.table.get(id)
    }

    fn get_mut(&mut self, id: &K) -> Option<&mut Occurrence> {
        self.table.get_mut(id)
    }

    /// Number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// =============================================================================
// Reference resolution
// =============================================================================

/// Bind target positions to source positions.
///
/// Fills `traces[s].reference` with the matched target position and returns
/// the reverse mapping, one entry per target position.
pub(crate) fn resolve_references<T, O>(
    table: &mut OccurrenceTable<'_, T::Id>,
    target: &[T],
    traces: &mut [Trace],
    section: usize,
    observer: &mut O,
) -> Vec<Option<usize>>
where
    T: Differentiable,
    O: DiffObserver + ?Sized,
{
    let mut target_references = vec![None; target.len()];

    for (target_index, element) in target.iter().enumerate() {
        let id = element.difference_id();

        let bound = match table.get_mut(&id) {
            None => continue,
            Some(Occurrence::Unique(source_index)) => {
                let source_index = *source_index;
                match traces[source_index].reference {
                    None => Some(source_index),
                    Some(_) => None,
                }
            }
            Some(Occurrence::Duplicate(queue)) => queue.next(),
        };

        match bound {
            Some(source_index) => {
                target_references[target_index] = Some(source_index);
                traces[source_index].reference = Some(target_index);
            }
            None => {
                let source_occurrences = table.get(&id).map_or(0, Occurrence::count);
                observer.on_surplus_target(SurplusTarget {
                    target: ElementPath::new(target_index, section),
                    source_occurrences,
                });
            }
        }
    }

    target_references
}

// =============================================================================
// Tests
// =============================================================================
