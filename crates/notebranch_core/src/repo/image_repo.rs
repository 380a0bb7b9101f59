//! Note image tracking persistence.

use crate::model::note_image::NoteImage;
use crate::repo::sync_repo::SyncRepository;
use crate::repo::{bool_to_int, read_flag, RepoError, RepoResult, SqliteStore};
use rusqlite::params;

/// Note image repository contract.
pub trait NoteImageRepository {
    /// Lists active tracking records of one note.
    fn list_note_images(&self, note_id: &str) -> RepoResult<Vec<NoteImage>>;
    fn insert_note_image(&self, note_image: &NoteImage) -> RepoResult<()>;
    fn update_note_image(&self, note_image: &NoteImage) -> RepoResult<()>;
}

impl NoteImageRepository for SqliteStore<'_> {
    fn list_note_images(&self, note_id: &str) -> RepoResult<Vec<NoteImage>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                note_image_id,
                note_id,
                image_id,
                is_deleted,
                date_created,
                date_modified
             FROM note_images
             WHERE note_id = ?1
               AND is_deleted = 0
             ORDER BY date_created ASC, note_image_id ASC;",
        )?;
        let mut rows = stmt.query([note_id])?;
        let mut images = Vec::new();
        while let Some(row) = rows.next()? {
            images.push(NoteImage {
                note_image_id: row.get("note_image_id")?,
                note_id: row.get("note_id")?,
                image_id: row.get("image_id")?,
                is_deleted: read_flag(row, "is_deleted", "note_images")?,
                date_created: row.get("date_created")?,
                date_modified: row.get("date_modified")?,
            });
        }
        Ok(images)
    }

    fn insert_note_image(&self, note_image: &NoteImage) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO note_images (
                note_image_id,
                note_id,
                image_id,
                is_deleted,
                date_created,
                date_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                note_image.note_image_id,
                note_image.note_id,
                note_image.image_id,
                bool_to_int(note_image.is_deleted),
                note_image.date_created,
                note_image.date_modified,
            ],
        )?;
        self.add_entity_sync("note_images", &note_image.note_image_id)
    }

    fn update_note_image(&self, note_image: &NoteImage) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE note_images
             SET
                is_deleted = ?2,
                date_modified = ?3
             WHERE note_image_id = ?1;",
            params![
                note_image.note_image_id,
                bool_to_int(note_image.is_deleted),
                note_image.date_modified,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "note image",
                id: note_image.note_image_id.clone(),
            });
        }
        self.add_entity_sync("note_images", &note_image.note_image_id)
    }
}
