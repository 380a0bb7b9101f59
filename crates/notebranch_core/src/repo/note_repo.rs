//! Note persistence and note-relationship accessors.
//!
//! # Invariants
//! - `get_note` returns tombstoned notes too; callers decide visibility.
//! - Child listing is deterministic: `note_position ASC, branch_id ASC`,
//!   over active branches and active notes only.

use crate::model::note::{Note, NoteType};
use crate::repo::sync_repo::SyncRepository;
use crate::repo::{bool_to_int, read_flag, RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Row};

const NOTE_COLUMNS: &str = "n.note_id AS note_id,
    n.title AS title,
    n.content AS content,
    n.type AS type,
    n.mime AS mime,
    n.is_protected AS is_protected,
    n.is_deleted AS is_deleted,
    n.date_created AS date_created,
    n.date_modified AS date_modified";

/// Note repository contract.
pub trait NoteRepository {
    /// Loads one note by id, including soft-deleted notes.
    fn get_note(&self, note_id: &str) -> RepoResult<Option<Note>>;
    /// Inserts a new note row.
    fn insert_note(&self, note: &Note) -> RepoResult<()>;
    /// Persists every mutable field of an existing note.
    fn update_note(&self, note: &Note) -> RepoResult<()>;
    /// Lists active notes placed under `parent_note_id` by active branches.
    fn list_child_notes(&self, parent_note_id: &str) -> RepoResult<Vec<Note>>;
}

impl NoteRepository for SqliteStore<'_> {
    fn get_note(&self, note_id: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes n WHERE n.note_id = ?1;"))?;
        let mut rows = stmt.query([note_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn insert_note(&self, note: &Note) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO notes (
                note_id,
                title,
                content,
                type,
                mime,
                is_protected,
                is_deleted,
                date_created,
                date_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                note.note_id,
                note.title,
                note.content,
                note.note_type.as_str(),
                note.mime,
                bool_to_int(note.is_protected),
                bool_to_int(note.is_deleted),
                note.date_created,
                note.date_modified,
            ],
        )?;
        self.add_entity_sync("notes", &note.note_id)
    }

    fn update_note(&self, note: &Note) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                type = ?4,
                mime = ?5,
                is_protected = ?6,
                is_deleted = ?7,
                date_modified = ?8
             WHERE note_id = ?1;",
            params![
                note.note_id,
                note.title,
                note.content,
                note.note_type.as_str(),
                note.mime,
                bool_to_int(note.is_protected),
                bool_to_int(note.is_deleted),
                note.date_modified,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "note",
                id: note.note_id.clone(),
            });
        }
        self.add_entity_sync("notes", &note.note_id)
    }

    fn list_child_notes(&self, parent_note_id: &str) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS}
             FROM branches b
             INNER JOIN notes n ON n.note_id = b.note_id
             WHERE b.parent_note_id = ?1
               AND b.is_deleted = 0
               AND n.is_deleted = 0
             ORDER BY b.note_position ASC, b.branch_id ASC;"
        ))?;
        let mut rows = stmt.query([parent_note_id])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let type_text: String = row.get("type")?;
    let note_type = NoteType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid note type `{type_text}` in notes.type"))
    })?;

    Ok(Note {
        note_id: row.get("note_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        note_type,
        mime: row.get("mime")?,
        is_protected: read_flag(row, "is_protected", "notes")?,
        is_deleted: read_flag(row, "is_deleted", "notes")?,
        date_created: row.get("date_created")?,
        date_modified: row.get("date_modified")?,
    })
}
