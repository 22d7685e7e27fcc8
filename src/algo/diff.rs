//! Linear identity-matching diff
//!
//! Classifies every position of two sequences as deleted, inserted,
//! updated and/or moved. This is a **pure algorithm module**: it only reads
//! its inputs and knows nothing about stages or views.
//!
//! # Algorithm
//!
//! 1. Index source identifiers ([`OccurrenceTable`]).
//! 2. Bind each target position to at most one source position.
//! 3. Source pass: unmatched source positions are deletions. Each trace
//!    records how many deletions precede it.
//! 4. Target pass: unmatched target positions are insertions. A matched pair
//!    whose content differs is an update. A matched pair is a move when its
//!    source is not the first still-untracked source position.
//!
//! # Complexity
//!
//! - Time: O(n + m). The untracked-source cursor only moves forward.
//! - Space: O(n + m)
//!
//! This is not a minimum edit distance. `[A, B, C] → [C, A, B]` reports one
//! move (C) but `[A, B, C] → [B, C, A]` reports two (B and C). In exchange
//! the output is deterministic and identity is never traded for fewer ops.

use crate::changeset::{ElementPath, MovedPath};
use crate::id::Differentiable;

use super::occurrence::{OccurrenceTable, resolve_references};

// =============================================================================
// Configuration
// =============================================================================

/// Which side's position an update is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UpdatedIndex {
    /// Position in the source sequence. Valid before any structural change.
    #[default]
    Source,
    /// Position in the target sequence. Valid once the list has its final shape.
    Target,
}

/// Diff options.
///
/// ```
/// use staged_diff::{DiffConfig, UpdatedIndex};
///
/// let config = DiffConfig::default()
///     .with_section(2)
///     .with_updated_index(UpdatedIndex::Target);
/// assert_eq!(config.section, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffConfig {
    /// Section tag applied to every reported position.
    /// Default: 0
    pub section: usize,
    /// Side used for `updated` positions.
    /// Default: [`UpdatedIndex::Source`]
    pub updated_index: UpdatedIndex,
}

impl DiffConfig {
    pub fn new(section: usize, updated_index: UpdatedIndex) -> Self {
        Self {
            section,
            updated_index,
        }
    }

    pub fn with_section(mut self, section: usize) -> Self {
        self.section = section;
        self
    }

    pub fn with_updated_index(mut self, updated_index: UpdatedIndex) -> Self {
        self.updated_index = updated_index;
        self
    }
}

// =============================================================================
// Observer
// =============================================================================

/// A target occurrence left unmatched although its identifier exists in
/// the source, because every source occurrence was already claimed.
///
/// The position is reported as an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurplusTarget {
    /// Target position reported as inserted.
    pub target: ElementPath,
    /// How many source positions carry the identifier.
    pub source_occurrences: usize,
}

/// Hook for diagnostics raised while diffing.
///
/// Nothing here is an error. Implement this to detect identifiers that were
/// expected to be unique but are not.
pub trait DiffObserver {
    fn on_surplus_target(&mut self, event: SurplusTarget);
}

impl DiffObserver for () {
    #[inline]
    fn on_surplus_target(&mut self, _event: SurplusTarget) {}
}

impl DiffObserver for Vec<SurplusTarget> {
    fn on_surplus_target(&mut self, event: SurplusTarget) {
        self.push(event);
    }
}

/// Observer that logs every event at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DiffObserver for TracingObserver {
    fn on_surplus_target(&mut self, event: SurplusTarget) {
        tracing::warn!(
            section = event.target.section,
            target = event.target.element,
            source_occurrences = event.source_occurrences,
            "identifier occurs more often in target than in source, treating as insertion"
        );
    }
}

// =============================================================================
// Trace
// =============================================================================

/// Per-source-position bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trace {
    /// Matched target position, `None` when the element is deleted.
    pub reference: Option<usize>,
    /// Number of deletions at source positions before this one.
    pub delete_offset: usize,
    /// Already accounted for by the target pass (or deleted).
    pub is_tracked: bool,
}

// =============================================================================
// Result
// =============================================================================

/// Counts from one diff.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct DiffStats {
    /// Pairs bound by identifier (moved or not).
    pub matched: usize,
    pub deleted: usize,
    pub inserted: usize,
    pub updated: usize,
    pub moved: usize,
}

impl DiffStats {
    /// Number of reported operations.
    pub fn edit_count(&self) -> usize {
        self.deleted + self.inserted + self.updated + self.moved
    }

    pub fn is_empty(&self) -> bool {
        self.edit_count() == 0
    }
}

/// Classified positions plus the bookkeeping used to build stage snapshots.
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct DiffResult {
    /// Deleted source positions, ascending.
    pub deleted: Vec<ElementPath>,
    /// Inserted target positions, ascending.
    pub inserted: Vec<ElementPath>,
    /// Updated positions, on the side chosen by [`DiffConfig::updated_index`].
    pub updated: Vec<ElementPath>,
    /// Moves from the post-deletion position to the target position,
    /// ascending by target.
    pub moved: Vec<MovedPath>,
    /// One trace per source position.
    pub traces: Vec<Trace>,
    /// Matched source position for each target position.
    pub target_references: Vec<Option<usize>>,
    pub stats: DiffStats,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        !self.stats.is_empty()
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Classify the differences between `source` and `target`.
///
/// Surplus target occurrences of an identifier are reported to `observer`.
///
/// # Example
///
/// ```
/// use staged_diff::{differentiate, DiffConfig};
///
/// let result = differentiate(&['a', 'b', 'c'], &['a', 'c'], &DiffConfig::default(), &mut ());
/// assert_eq!(result.deleted.len(), 1);
/// assert_eq!(result.deleted[0].element, 1);
/// ```
pub fn differentiate<T, O>(
    source: &[T],
    target: &[T],
    config: &DiffConfig,
    observer: &mut O,
) -> DiffResult
where
    T: Differentiable,
    O: DiffObserver + ?Sized,
{
    let section = config.section;
    let path = |element: usize| ElementPath::new(element, section);

    let mut traces = vec![Trace::default(); source.len()];

    let source_ids: Vec<T::Id> = source.iter().map(Differentiable::difference_id).collect();
    let mut table = OccurrenceTable::build(&source_ids);
    let target_references =
        resolve_references(&mut table, target, &mut traces, section, observer);

    let mut deleted = Vec::new();
    let mut inserted = Vec::new();
    let mut updated = Vec::new();
    let mut moved = Vec::new();

    // Deletions
    let mut delete_offset = 0;
    for (source_index, trace) in traces.iter_mut().enumerate() {
        trace.delete_offset = delete_offset;

        if trace.reference.is_none() {
            deleted.push(path(source_index));
            trace.is_tracked = true;
            delete_offset += 1;
        }
    }

    // Insertions, updates and moves
    let mut untracked = UntrackedCursor::default();
    for (target_index, reference) in target_references.iter().enumerate() {
        let first_untracked = untracked.advance(&traces);

        let Some(source_index) = *reference else {
            inserted.push(path(target_index));
            continue;
        };

        traces[source_index].is_tracked = true;

        if !target[target_index].is_content_equal(&source[source_index]) {
            let index = match config.updated_index {
                UpdatedIndex::Source => source_index,
                UpdatedIndex::Target => target_index,
            };
            updated.push(path(index));
        }

        if Some(source_index) != first_untracked {
            let delete_offset = traces[source_index].delete_offset;
            moved.push(MovedPath::new(path(source_index - delete_offset), path(target_index)));
        }
    }

    let stats = DiffStats {
        matched: target.len() - inserted.len(),
        deleted: deleted.len(),
        inserted: inserted.len(),
        updated: updated.len(),
        moved: moved.len(),
    };

    DiffResult {
        deleted,
        inserted,
        updated,
        moved,
        traces,
        target_references,
        stats,
    }
}

// =============================================================================
// Internal
// =============================================================================

/// Smallest source position not yet tracked. Never moves backward.
#[derive(Default)]
struct UntrackedCursor {
    position: usize,
}

impl UntrackedCursor {
    fn advance(&mut self, traces: &[Trace]) -> Option<usize> {
        while self.position < traces.len() && traces[self.position].is_tracked {
            self.position += 1;
        }
        (self.position < traces.len()).then_some(self.position)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Keyed;

    fn diff<T: Differentiable>(source: &[T], target: &[T]) -> DiffResult {
        differentiate(source, target, &DiffConfig::default(), &mut ())
    }

    fn elements(paths: &[ElementPath]) -> Vec<usize> {
        paths.iter().map(|p| p.element).collect()
    }

    fn moves(result: &DiffResult) -> Vec<(usize, usize)> {
        result
            .moved
            .iter()
            .map(|m| (m.source.element, m.target.element))
            .collect()
    }

    #[test]
    fn test_no_changes() {
        let result = diff(&['a', 'b', 'c'], &['a', 'b', 'c']);
        assert!(!result.has_changes());
        assert_eq!(result.stats.matched, 3);
    }

    #[test]
    fn test_single_delete() {
        let result = diff(&['a', 'b', 'c'], &['a', 'c']);
        assert_eq!(elements(&result.deleted), vec![1]);
        assert!(result.inserted.is_empty());
        assert!(result.moved.is_empty());
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_single_insert() {
        let result = diff(&['a', 'c'], &['a', 'b', 'c']);
        assert_eq!(elements(&result.inserted), vec![1]);
        assert!(result.deleted.is_empty());
        assert!(result.moved.is_empty());
    }

    #[test]
    fn test_swap_is_single_move() {
        let result = diff(&['a', 'b'], &['b', 'a']);
        assert_eq!(moves(&result), vec![(1, 0)]);
        assert!(result.deleted.is_empty());
        assert!(result.inserted.is_empty());
    }

    #[test]
    fn test_rotate_right_moves_one() {
        let result = diff(&['a', 'b', 'c'], &['c', 'a', 'b']);
        assert_eq!(moves(&result), vec![(2, 0)]);
    }

    #[test]
    fn test_rotate_left_moves_tail() {
        let result = diff(&['a', 'b', 'c'], &['b', 'c', 'a']);
        assert_eq!(moves(&result), vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn test_move_source_is_post_delete_position() {
        // 'x' is deleted, so 'c' sits at 1 once deletions are applied.
        let result = diff(&['x', 'b', 'c'], &['c', 'b']);
        assert_eq!(elements(&result.deleted), vec![0]);
        assert_eq!(result.traces[2].delete_offset, 1);
        assert_eq!(moves(&result), vec![(1, 0)]);
    }

    #[test]
    fn test_update_reported_at_source() {
        let source = [Keyed::new("x", 0), Keyed::new("a", 1)];
        let target = [Keyed::new("a", 2), Keyed::new("x", 0)];
        let result = diff(&source, &target);

        assert_eq!(elements(&result.updated), vec![1]);
        assert_eq!(moves(&result), vec![(1, 0)]);
    }

    #[test]
    fn test_update_reported_at_target() {
        let source = [Keyed::new("x", 0), Keyed::new("a", 1)];
        let target = [Keyed::new("a", 2), Keyed::new("x", 0)];
        let config = DiffConfig::default().with_updated_index(UpdatedIndex::Target);
        let result = differentiate(&source, &target, &config, &mut ());

        assert_eq!(elements(&result.updated), vec![0]);
    }

    #[test]
    fn test_in_place_update_is_not_move() {
        let result = diff(&[Keyed::new("a", 1)], &[Keyed::new("a", 2)]);
        assert_eq!(elements(&result.updated), vec![0]);
        assert!(result.moved.is_empty());
        assert!(result.deleted.is_empty());
        assert!(result.inserted.is_empty());
    }

    #[test]
    fn test_duplicate_source_fifo() {
        let source = [Keyed::new("x", 1), Keyed::new("x", 2)];
        let target = [Keyed::new("x", 1)];
        let result = diff(&source, &target);

        assert_eq!(result.target_references, vec![Some(0)]);
        assert_eq!(elements(&result.deleted), vec![1]);
        assert!(result.updated.is_empty());
    }

    #[test]
    fn test_section_tag_on_every_path() {
        let config = DiffConfig::default().with_section(4);
        let result = differentiate(&['a', 'b'], &['b', 'c'], &config, &mut ());

        assert!(result.deleted.iter().all(|p| p.section == 4));
        assert!(result.inserted.iter().all(|p| p.section == 4));
    }

    #[test]
    fn test_surplus_target_reported() {
        let mut events: Vec<SurplusTarget> = Vec::new();
        let result = differentiate(&['a'], &['a', 'a'], &DiffConfig::default(), &mut events);

        assert_eq!(elements(&result.inserted), vec![1]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target.element, 1);
    }

    #[test]
    fn test_tracing_observer_does_not_change_result() {
        let source = ['a', 'b'];
        let target = ['b', 'b', 'a'];
        let traced = differentiate(&source, &target, &DiffConfig::default(), &mut TracingObserver);
        let silent = diff(&source, &target);

        assert_eq!(traced.inserted, silent.inserted);
        assert_eq!(traced.moved, silent.moved);
    }

    #[test]
    fn test_counts_partition_both_sides() {
        let source = ['a', 'b', 'c', 'd', 'e'];
        let target = ['e', 'x', 'c', 'a', 'y'];
        let result = diff(&source, &target);

        assert_eq!(result.stats.deleted + result.stats.matched, source.len());
        assert_eq!(result.stats.inserted + result.stats.matched, target.len());
    }

    #[test]
    fn test_config_builders() {
        let config = DiffConfig::new(1, UpdatedIndex::Source).with_section(3);
        assert_eq!(config.section, 3);
        assert_eq!(config.updated_index, UpdatedIndex::Source);
        assert_eq!(DiffConfig::default().section, 0);
    }
}
