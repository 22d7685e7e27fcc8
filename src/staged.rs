//! Staged changesets
//!
//! Splits a classified diff into up to three stages that a live view can
//! apply one after another without recomputing positions:
//!
//! ```text
//! source ──update──▶ same shape, new content
//!        ──delete──▶ shrink, order kept
//!        ──insert/move──▶ target
//! ```
//!
//! Each stage addresses the snapshot left by the stage before it. Stages
//! without operations are skipped, so a diff yields 0 to 3 stages. The last
//! stage's snapshot is always exactly the target.

use std::fmt;
use std::ops::Deref;

use crate::algo::{DiffConfig, DiffObserver, DiffResult, UpdatedIndex, differentiate};
use crate::changeset::{Changeset, ElementPath, StageKind};
use crate::error::StageResult;
use crate::id::Differentiable;

// =============================================================================
// StagedChangeset
// =============================================================================

/// Ordered stages transforming a source list into a target list.
///
/// # Example
///
/// ```
/// use staged_diff::StagedChangeset;
///
/// let source = vec!['a', 'b', 'c'];
/// let target = vec!['c', 'a', 'x'];
///
/// let staged = StagedChangeset::new(&source, &target);
///
/// let mut view = source.clone();
/// for stage in &staged {
///     // render `stage` here, one atomic batch at a time
///     stage.apply_to(&mut view).unwrap();
/// }
/// assert_eq!(view, target);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct StagedChangeset<T> {
    changesets: Vec<Changeset<T>>,
}

impl<T: Differentiable + Clone> StagedChangeset<T> {
    /// Diff `source` against `target` in section 0.
    pub fn new(source: &[T], target: &[T]) -> Self {
        Self::with_config(source, target, DiffConfig::default())
    }

    /// Diff `source` against `target`, tagging every position with `section`.
    pub fn with_section(source: &[T], target: &[T], section: usize) -> Self {
        Self::with_config(source, target, DiffConfig::default().with_section(section))
    }

    pub fn with_config(source: &[T], target: &[T], config: DiffConfig) -> Self {
        Self::with_observer(source, target, config, &mut ())
    }

    /// Diff with a [`DiffObserver`] receiving diagnostics.
    pub fn with_observer<O>(
        source: &[T],
        target: &[T],
        config: DiffConfig,
        observer: &mut O,
    ) -> Self
    where
        O: DiffObserver + ?Sized,
    {
        let section = config.section;

        // Quick paths
        if source.is_empty() && target.is_empty() {
            return Self::default();
        }

        if target.is_empty() {
            tracing::trace!(section, deleted = source.len(), "target empty, deleting all");
            let deleted = (0..source.len()).map(|i| ElementPath::new(i, section)).collect();
            let changeset = Changeset::new(StageKind::Delete, Vec::new()).with_deleted(deleted);
            return Self::from_changesets(vec![changeset]);
        }

        if source.is_empty() {
            tracing::trace!(section, inserted = target.len(), "source empty, inserting all");
            let inserted = (0..target.len()).map(|i| ElementPath::new(i, section)).collect();
            let changeset =
                Changeset::new(StageKind::InsertMove, target.to_vec()).with_inserted(inserted);
            return Self::from_changesets(vec![changeset]);
        }

        let result = differentiate(source, target, &config, observer);
        let stats = result.stats;
        let staged = Self::from_changesets(stage(source, target, config.updated_index, result));

        tracing::debug!(
            section,
            stages = staged.len(),
            deleted = stats.deleted,
            inserted = stats.inserted,
            updated = stats.updated,
            moved = stats.moved,
            "staged diff computed"
        );

        staged
    }
}

impl<T> StagedChangeset<T> {
    pub fn from_changesets(changesets: Vec<Changeset<T>>) -> Self {
        Self { changesets }
    }

    pub fn into_changesets(self) -> Vec<Changeset<T>> {
        self.changesets
    }

    /// Total number of operations across all stages.
    pub fn change_count(&self) -> usize {
        self.changesets.iter().map(Changeset::change_count).sum()
    }
}

impl<T: Clone> StagedChangeset<T> {
    /// Apply every stage in order to `view`, which must hold the source list.
    ///
    /// Stops at the first stage that does not fit the view. Stages before it
    /// stay applied.
    pub fn apply_to(&self, view: &mut Vec<T>) -> StageResult<()> {
        for changeset in &self.changesets {
            changeset.apply_to(view)?;
        }
        Ok(())
    }
}

impl<T> Default for StagedChangeset<T> {
    fn default() -> Self {
        Self {
            changesets: Vec::new(),
        }
    }
}

impl<T> Deref for StagedChangeset<T> {
    type Target = [Changeset<T>];

    fn deref(&self) -> &Self::Target {
        &self.changesets
    }
}

impl<T> From<Vec<Changeset<T>>> for StagedChangeset<T> {
    fn from(changesets: Vec<Changeset<T>>) -> Self {
        Self::from_changesets(changesets)
    }
}

impl<T> FromIterator<Changeset<T>> for StagedChangeset<T> {
    fn from_iter<I: IntoIterator<Item = Changeset<T>>>(iter: I) -> Self {
        Self::from_changesets(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for StagedChangeset<T> {
    type Item = Changeset<T>;
    type IntoIter = std::vec::IntoIter<Changeset<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changesets.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a StagedChangeset<T> {
    type Item = &'a Changeset<T>;
    type IntoIter = std::slice::Iter<'a, Changeset<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.changesets.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for StagedChangeset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.changesets).finish()
    }
}

// =============================================================================
// Sections
// =============================================================================

/// Diff independent sections, each given as a `(source, target)` pair.
///
/// The i-th result is tagged with section `config.section + i`. Sections
/// never exchange elements.
#[cfg(not(feature = "parallel"))]
pub fn diff_sections<T, S>(sections: &[(S, S)], config: DiffConfig) -> Vec<StagedChangeset<T>>
where
    T: Differentiable + Clone,
    S: AsRef<[T]>,
{
    sections
        .iter()
        .enumerate()
        .map(|(i, (source, target))| diff_section(source.as_ref(), target.as_ref(), config, i))
        .collect()
}

/// Diff independent sections, each given as a `(source, target)` pair.
///
/// The i-th result is tagged with section `config.section + i`. Sections
/// never exchange elements, so they are diffed in parallel.
#[cfg(feature = "parallel")]
pub fn diff_sections<T, S>(sections: &[(S, S)], config: DiffConfig) -> Vec<StagedChangeset<T>>
where
    T: Differentiable + Clone + Send + Sync,
    S: AsRef<[T]> + Sync,
{
    use rayon::prelude::*;

    sections
        .par_iter()
        .enumerate()
        .map(|(i, (source, target))| diff_section(source.as_ref(), target.as_ref(), config, i))
        .collect()
}

fn diff_section<T>(
    source: &[T],
    target: &[T],
    config: DiffConfig,
    offset: usize,
) -> StagedChangeset<T>
where
    T: Differentiable + Clone,
{
    let config = config.with_section(config.section + offset);
    StagedChangeset::with_config(source, target, config)
}

// =============================================================================
// Stager
// =============================================================================

/// Partition a classified diff into ordered stages.
fn stage<T: Clone>(
    source: &[T],
    target: &[T],
    updated_index: UpdatedIndex,
    result: DiffResult,
) -> Vec<Changeset<T>> {
    let DiffResult {
        deleted,
        inserted,
        updated,
        moved,
        traces,
        ..
    } = result;

    // Target-side update positions only exist once the list has its final
    // shape, so they ride along with the insert/move stage.
    let updates_first = updated_index == UpdatedIndex::Source;
    let (first_updates, last_updates) = if updates_first {
        (updated, Vec::new())
    } else {
        (Vec::new(), updated)
    };

    let mut changesets = Vec::with_capacity(3);

    // 1st stage: updates
    if !first_updates.is_empty() {
        let data = traces
            .iter()
            .zip(source)
            .map(|(trace, element)| match trace.reference {
                Some(target_index) => target[target_index].clone(),
                None => element.clone(),
            })
            .collect();
        changesets.push(Changeset::new(StageKind::Update, data).with_updated(first_updates));
    }

    // 2nd stage: deletes
    if !deleted.is_empty() {
        let data = traces
            .iter()
            .zip(source)
            .filter_map(|(trace, element)| {
                let target_index = trace.reference?;
                Some(if updates_first {
                    target[target_index].clone()
                } else {
                    element.clone()
                })
            })
            .collect();
        changesets.push(Changeset::new(StageKind::Delete, data).with_deleted(deleted));
    }

    // 3rd stage: inserts, moves (and target-side updates)
    if !inserted.is_empty() || !moved.is_empty() || !last_updates.is_empty() {
        changesets.push(
            Changeset::new(StageKind::InsertMove, Vec::new())
                .with_inserted(inserted)
                .with_moved(moved)
                .with_updated(last_updates),
        );
    }

    // The last stage always lands exactly on the target.
    if let Some(last) = changesets.last_mut() {
        last.data = target.to_vec();
    }

    changesets
}

// =============================================================================
// Tests
// =============================================================================
