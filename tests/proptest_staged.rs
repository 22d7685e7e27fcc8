//! Property tests for staged diffs.
//!
//! Small identifier and content alphabets force plenty of duplicates,
//! moves and updates in every generated case.

use std::collections::HashSet;

use proptest::prelude::*;
use staged_diff::{
    differentiate, DiffConfig, Differentiable, StageKind, StagedChangeset, UpdatedIndex,
};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: u8,
    content: u8,
}

impl Differentiable for Item {
    type Id = u8;

    fn difference_id(&self) -> u8 {
        self.id
    }

    fn is_content_equal(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

fn items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((0u8..10, 0u8..3), 0..24)
        .prop_map(|pairs| pairs.into_iter().map(|(id, content)| Item { id, content }).collect())
}

fn updated_index() -> impl Strategy<Value = UpdatedIndex> {
    prop_oneof![Just(UpdatedIndex::Source), Just(UpdatedIndex::Target)]
}

fn stage_rank(kind: StageKind) -> u8 {
    match kind {
        StageKind::Update => 0,
        StageKind::Delete => 1,
        StageKind::InsertMove => 2,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn applying_stages_reproduces_target(
        source in items(),
        target in items(),
        updated_index in updated_index(),
    ) {
        let config = DiffConfig::default().with_updated_index(updated_index);
        let staged = StagedChangeset::with_config(&source, &target, config);

        let mut view = source.clone();
        for changeset in &staged {
            prop_assert!(changeset.apply_to(&mut view).is_ok(), "stage rejected: {:?}", changeset);
            prop_assert_eq!(&view, &changeset.data);
        }
        prop_assert_eq!(view, target);
    }

    #[test]
    fn every_position_is_accounted_for_once(source in items(), target in items()) {
        let result = differentiate(&source, &target, &DiffConfig::default(), &mut ());

        prop_assert_eq!(result.deleted.len() + result.stats.matched, source.len());
        prop_assert_eq!(result.inserted.len() + result.stats.matched, target.len());

        let deleted: HashSet<usize> = result.deleted.iter().map(|p| p.element).collect();
        let inserted: HashSet<usize> = result.inserted.iter().map(|p| p.element).collect();

        for moved in &result.moved {
            prop_assert!(!inserted.contains(&moved.target.element));
            let source_index = result.target_references[moved.target.element];
            prop_assert!(source_index.is_some());
            prop_assert!(!deleted.contains(&source_index.unwrap_or_default()));
        }

        for (source_index, trace) in result.traces.iter().enumerate() {
            prop_assert_eq!(trace.reference.is_none(), deleted.contains(&source_index));
        }
    }

    #[test]
    fn identical_inputs_produce_no_stages(source in items()) {
        let staged = StagedChangeset::new(&source, &source);
        prop_assert!(staged.is_empty());
    }

    #[test]
    fn diffing_is_deterministic(source in items(), target in items()) {
        prop_assert_eq!(
            StagedChangeset::new(&source, &target),
            StagedChangeset::new(&source, &target)
        );
    }

    #[test]
    fn stages_are_ordered_and_non_empty(
        source in items(),
        target in items(),
        section in 0usize..4,
    ) {
        let staged = StagedChangeset::with_section(&source, &target, section);

        prop_assert!(staged.len() <= 3);
        for pair in staged.windows(2) {
            prop_assert!(stage_rank(pair[0].kind) < stage_rank(pair[1].kind));
        }
        for changeset in &staged {
            prop_assert!(changeset.has_changes());
            prop_assert!(changeset.element_deleted.iter().all(|p| p.section == section));
            prop_assert!(changeset.element_inserted.iter().all(|p| p.section == section));
        }
        if let Some(last) = staged.last() {
            prop_assert_eq!(&last.data, &target);
        }
    }
}
