//! Note revision persistence.

use crate::model::revision::{NoteRevision, NoteRevisionId};
use crate::repo::sync_repo::SyncRepository;
use crate::repo::{bool_to_int, read_flag, RepoError, RepoResult, SqliteStore};
use rusqlite::{params, OptionalExtension, Row};

/// Revision repository contract.
pub trait RevisionRepository {
    fn insert_revision(&self, revision: &NoteRevision) -> RepoResult<()>;
    fn update_revision(&self, revision: &NoteRevision) -> RepoResult<()>;
    /// Lists every revision of one note, oldest snapshot first.
    fn list_note_revisions(&self, note_id: &str) -> RepoResult<Vec<NoteRevision>>;
    /// Finds any revision of `note_id` whose `date_modified_to` is at or
    /// after `cutoff` (canonical timestamp string, compared lexically).
    fn find_revision_since(&self, note_id: &str, cutoff: &str)
        -> RepoResult<Option<NoteRevisionId>>;
}

impl RevisionRepository for SqliteStore<'_> {
    fn insert_revision(&self, revision: &NoteRevision) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO note_revisions (
                note_revision_id,
                note_id,
                title,
                content,
                is_protected,
                date_modified_from,
                date_modified_to
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                revision.note_revision_id,
                revision.note_id,
                revision.title,
                revision.content,
                bool_to_int(revision.is_protected),
                revision.date_modified_from,
                revision.date_modified_to,
            ],
        )?;
        self.add_entity_sync("note_revisions", &revision.note_revision_id)
    }

    fn update_revision(&self, revision: &NoteRevision) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE note_revisions
             SET
                title = ?2,
                content = ?3,
                is_protected = ?4,
                date_modified_from = ?5,
                date_modified_to = ?6
             WHERE note_revision_id = ?1;",
            params![
                revision.note_revision_id,
                revision.title,
                revision.content,
                bool_to_int(revision.is_protected),
                revision.date_modified_from,
                revision.date_modified_to,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "note revision",
                id: revision.note_revision_id.clone(),
            });
        }
        self.add_entity_sync("note_revisions", &revision.note_revision_id)
    }

    fn list_note_revisions(&self, note_id: &str) -> RepoResult<Vec<NoteRevision>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                note_revision_id,
                note_id,
                title,
                content,
                is_protected,
                date_modified_from,
                date_modified_to
             FROM note_revisions
             WHERE note_id = ?1
             ORDER BY date_modified_to ASC, note_revision_id ASC;",
        )?;
        let mut rows = stmt.query([note_id])?;
        let mut revisions = Vec::new();
        while let Some(row) = rows.next()? {
            revisions.push(parse_revision_row(row)?);
        }
        Ok(revisions)
    }

    fn find_revision_since(
        &self,
        note_id: &str,
        cutoff: &str,
    ) -> RepoResult<Option<NoteRevisionId>> {
        let found = self
            .conn
            .query_row(
                "SELECT note_revision_id
                 FROM note_revisions
                 WHERE note_id = ?1
                   AND date_modified_to >= ?2
                 LIMIT 1;",
                params![note_id, cutoff],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found)
    }
}

fn parse_revision_row(row: &Row<'_>) -> RepoResult<NoteRevision> {
    Ok(NoteRevision {
        note_revision_id: row.get("note_revision_id")?,
        note_id: row.get("note_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        is_protected: read_flag(row, "is_protected", "note_revisions")?,
        date_modified_from: row.get("date_modified_from")?,
        date_modified_to: row.get("date_modified_to")?,
    })
}
