//! Label store.
//!
//! # Invariants
//! - `label_map` reflects active labels only; for repeated names the most
//!   recently inserted value wins.

use crate::model::label::Label;
use crate::repo::sync_repo::SyncRepository;
use crate::repo::{bool_to_int, RepoResult, SqliteStore};
use rusqlite::params;
use std::collections::BTreeMap;

/// Label repository contract.
pub trait LabelRepository {
    fn insert_label(&self, label: &Label) -> RepoResult<()>;
    /// Active labels of one note as `name -> value`.
    fn label_map(&self, note_id: &str) -> RepoResult<BTreeMap<String, String>>;
}

impl LabelRepository for SqliteStore<'_> {
    fn insert_label(&self, label: &Label) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO labels (
                label_id,
                note_id,
                name,
                value,
                is_deleted,
                date_created
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                label.label_id,
                label.note_id,
                label.name,
                label.value,
                bool_to_int(label.is_deleted),
                label.date_created,
            ],
        )?;
        self.add_entity_sync("labels", &label.label_id)
    }

    fn label_map(&self, note_id: &str) -> RepoResult<BTreeMap<String, String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, value
             FROM labels
             WHERE note_id = ?1
               AND is_deleted = 0
             ORDER BY rowid ASC;",
        )?;
        let mut rows = stmt.query([note_id])?;
        let mut labels = BTreeMap::new();
        while let Some(row) = rows.next()? {
            labels.insert(row.get("name")?, row.get("value")?);
        }
        Ok(labels)
    }
}
