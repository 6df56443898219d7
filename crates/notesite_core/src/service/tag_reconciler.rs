//! Note tag reconciliation.
//!
//! # Responsibility
//! - Compute which note↔tag associations to add and remove when a note's
//!   tag selection changes.
//! - Submit those changes as independent data API requests.
//!
//! # Invariants
//! - `to_add ∩ initial = ∅` and `to_remove ⊆ initial`.
//! - `(initial ∪ to_add) \ to_remove = desired`.
//! - Submission is not atomic: on failure the first error is returned and
//!   requests that already completed stay applied.

use crate::api::client::ApiResult;
use crate::api::tag_api::TagApi;
use crate::model::note::NoteId;
use crate::model::tag::TagId;
use futures::future::{try_join, try_join_all};
use log::{info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Association changes needed to move from one tag set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    pub to_add: BTreeSet<TagId>,
    pub to_remove: BTreeSet<TagId>,
}

impl TagDiff {
    /// Returns whether no association changes are needed.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes `desired − initial` and `initial − desired`.
pub fn diff_tags(initial: &BTreeSet<TagId>, desired: &BTreeSet<TagId>) -> TagDiff {
    TagDiff {
        to_add: desired.difference(initial).copied().collect(),
        to_remove: initial.difference(desired).copied().collect(),
    }
}

/// Submits every add and remove of `diff` concurrently.
///
/// # Errors
/// Returns the first failing request. Other requests may already have been
/// applied; nothing is retried or rolled back.
pub async fn apply_tag_diff<A>(api: &A, note_id: NoteId, diff: &TagDiff) -> ApiResult<()>
where
    A: TagApi + ?Sized,
{
    if diff.is_empty() {
        return Ok(());
    }

    let adds = try_join_all(
        diff.to_add
            .iter()
            .map(|tag_id| api.link_tag(note_id, *tag_id)),
    );
    let removes = try_join_all(
        diff.to_remove
            .iter()
            .map(|tag_id| api.unlink_tag(note_id, *tag_id)),
    );

    match try_join(adds, removes).await {
        Ok(_) => {
            info!(
                "event=note_tags_reconcile module=service status=ok note_id={note_id} added={} removed={}",
                diff.to_add.len(),
                diff.to_remove.len()
            );
            Ok(())
        }
        Err(err) => {
            warn!(
                "event=note_tags_reconcile module=service status=error note_id={note_id} added={} removed={} partial=possible",
                diff.to_add.len(),
                diff.to_remove.len()
            );
            Err(err)
        }
    }
}

/// A submitted tag value that is not a numeric id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIdParseError {
    pub value: String,
}

impl Display for TagIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid tag id `{}`", self.value)
    }
}

impl Error for TagIdParseError {}

/// Parses submitted tag id strings into a set.
///
/// Blank values are skipped; duplicates collapse.
pub fn parse_tag_ids<I, S>(values: I) -> Result<BTreeSet<TagId>, TagIdParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ids = BTreeSet::new();
    for value in values {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let id = trimmed.parse::<TagId>().map_err(|_| TagIdParseError {
            value: trimmed.to_string(),
        })?;
        ids.insert(id);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::{diff_tags, parse_tag_ids, TagDiff};
    use crate::model::tag::TagId;
    use proptest::collection::btree_set;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn set(values: &[TagId]) -> BTreeSet<TagId> {
        values.iter().copied().collect()
    }

    #[test]
    fn diff_splits_added_and_removed_ids() {
        let diff = diff_tags(&set(&[1, 2, 3]), &set(&[2, 3, 4, 5]));
        assert_eq!(diff.to_add, set(&[4, 5]));
        assert_eq!(diff.to_remove, set(&[1]));
    }

    #[test]
    fn diff_from_empty_adds_everything() {
        let diff = diff_tags(&BTreeSet::new(), &set(&[7, 8]));
        assert_eq!(diff.to_add, set(&[7, 8]));
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn diff_to_empty_removes_everything() {
        let diff = diff_tags(&set(&[7, 8]), &BTreeSet::new());
        assert!(diff.to_add.is_empty());
        assert_eq!(diff.to_remove, set(&[7, 8]));
    }

    #[test]
    fn parse_tag_ids_skips_blanks_and_dedupes() {
        let ids = parse_tag_ids(["3", " 1 ", "", "3"]).expect("numeric ids parse");
        assert_eq!(ids, set(&[1, 3]));
    }

    #[test]
    fn parse_tag_ids_rejects_non_numeric_values() {
        let err = parse_tag_ids(vec!["1".to_string(), "rust".to_string()])
            .expect_err("non-numeric id rejected");
        assert_eq!(err.value, "rust");
    }

    proptest! {
        #[test]
        fn diff_laws_hold(
            initial in btree_set(0i64..32, 0..16),
            desired in btree_set(0i64..32, 0..16),
        ) {
            let diff = diff_tags(&initial, &desired);
            prop_assert!(diff.to_add.is_disjoint(&initial));
            prop_assert!(diff.to_remove.is_subset(&initial));

            let applied: BTreeSet<TagId> = initial
                .union(&diff.to_add)
                .copied()
                .filter(|id| !diff.to_remove.contains(id))
                .collect();
            prop_assert_eq!(applied, desired);
        }

        #[test]
        fn diff_of_identical_sets_is_empty(tags in btree_set(0i64..64, 0..24)) {
            prop_assert_eq!(diff_tags(&tags, &tags), TagDiff::default());
        }
    }
}
