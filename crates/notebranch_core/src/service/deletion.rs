//! Soft-deletion cascade over placements.
//!
//! Deleting a branch removes one placement. Its note is deleted only once no
//! active placement remains, and only then does the cascade continue into
//! the note's child placements.

use crate::clock::Clock;
use crate::model::branch::{Branch, BranchId};
use crate::model::note::NoteId;
use crate::repo::{BranchRepository, NoteRepository, NoteStore};
use crate::service::error::ServiceResult;
use log::info;
use std::collections::HashSet;

/// Entities soft-deleted by one cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted_branch_ids: Vec<BranchId>,
    pub deleted_note_ids: Vec<NoteId>,
}

impl DeletionReport {
    pub fn is_noop(&self) -> bool {
        self.deleted_branch_ids.is_empty() && self.deleted_note_ids.is_empty()
    }
}

/// Soft-deletes `branch` and cascades as one transaction.
///
/// A missing or already-deleted branch performs no writes.
pub fn delete_note<S, C>(store: &S, clock: &C, branch: Option<Branch>) -> ServiceResult<DeletionReport>
where
    S: NoteStore,
    C: Clock,
{
    let Some(branch) = branch.filter(|branch| !branch.is_deleted) else {
        return Ok(DeletionReport::default());
    };

    let report = store.transaction(|| -> ServiceResult<DeletionReport> {
        let mut report = DeletionReport::default();
        let mut visited = HashSet::new();
        cascade(store, clock, branch, &mut visited, &mut report)?;
        Ok(report)
    })?;
    info!(
        "event=note_delete module=deletion status=ok branches={} notes={}",
        report.deleted_branch_ids.len(),
        report.deleted_note_ids.len()
    );
    Ok(report)
}

fn cascade<S, C>(
    store: &S,
    clock: &C,
    mut branch: Branch,
    visited: &mut HashSet<BranchId>,
    report: &mut DeletionReport,
) -> ServiceResult<()>
where
    S: NoteRepository + BranchRepository,
    C: Clock,
{
    if branch.is_deleted || !visited.insert(branch.branch_id.clone()) {
        return Ok(());
    }

    branch.is_deleted = true;
    branch.date_modified = clock.now_string();
    store.update_branch(&branch)?;
    report.deleted_branch_ids.push(branch.branch_id.clone());

    let Some(mut note) = store.get_note(&branch.note_id)? else {
        return Ok(());
    };
    if !store.list_note_branches(&note.note_id)?.is_empty() {
        return Ok(());
    }

    if !note.is_deleted {
        note.is_deleted = true;
        note.date_modified = clock.now_string();
        store.update_note(&note)?;
        report.deleted_note_ids.push(note.note_id.clone());
    }

    for child in store.list_child_branches(&note.note_id)? {
        cascade(store, clock, child, visited, report)?;
    }
    Ok(())
}
