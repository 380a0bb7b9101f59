//! Protection (encryption flag) propagation.
//!
//! # Invariants
//! - A revision's `is_protected` always ends equal to its note's flag.
//! - Writes happen only for entities whose flag actually changes.
//! - Recursive propagation visits each reachable note once per call, so
//!   shared placements and placement cycles terminate.

use crate::model::note::{Note, NoteId};
use crate::repo::{NoteRepository, NoteStore, RevisionRepository};
use crate::service::error::ServiceResult;
use log::info;
use std::collections::HashSet;

/// Sets the protection flag of `note` and aligns its revisions.
///
/// Returns `true` when the note itself was rewritten.
pub fn protect_note<S>(store: &S, note: &mut Note, protect: bool) -> ServiceResult<bool>
where
    S: NoteRepository + RevisionRepository,
{
    let changed = note.is_protected != protect;
    if changed {
        note.is_protected = protect;
        store.update_note(note)?;
    }
    protect_note_revisions(store, note)?;
    Ok(changed)
}

/// Aligns every revision's protection flag with `note`.
///
/// Returns the number of rewritten revisions.
pub fn protect_note_revisions<S: RevisionRepository>(store: &S, note: &Note) -> ServiceResult<usize> {
    let mut updated = 0;
    for mut revision in store.list_note_revisions(&note.note_id)? {
        if revision.is_protected != note.is_protected {
            revision.is_protected = note.is_protected;
            store.update_revision(&revision)?;
            updated += 1;
        }
    }
    Ok(updated)
}

/// Applies [`protect_note`] to `note` and every note reachable through
/// active child placements, as one transaction.
///
/// Returns the number of distinct notes visited.
pub fn protect_note_recursively<S: NoteStore>(
    store: &S,
    note: Note,
    protect: bool,
) -> ServiceResult<usize> {
    let root_id = note.note_id.clone();
    let visited = store.transaction(|| -> ServiceResult<HashSet<NoteId>> {
        let mut visited = HashSet::new();
        protect_subtree(store, note, protect, &mut visited)?;
        Ok(visited)
    })?;
    info!(
        "event=note_protect module=protection status=ok note_id={root_id} protect={protect} visited={}",
        visited.len()
    );
    Ok(visited.len())
}

fn protect_subtree<S>(
    store: &S,
    mut note: Note,
    protect: bool,
    visited: &mut HashSet<NoteId>,
) -> ServiceResult<()>
where
    S: NoteRepository + RevisionRepository,
{
    if !visited.insert(note.note_id.clone()) {
        return Ok(());
    }
    protect_note(store, &mut note, protect)?;
    for child in store.list_child_notes(&note.note_id)? {
        protect_subtree(store, child, protect, visited)?;
    }
    Ok(())
}
