//! Replication notification log.
//!
//! Entity writes append one row naming the changed entity. A sibling
//! reorder appends a single `note_reordering` row for the parent instead of
//! one row per shifted branch.

use crate::repo::{RepoResult, SqliteStore};
use rusqlite::params;

/// Entity name recorded when a parent's child order changes.
pub const NOTE_REORDERING_ENTITY: &str = "note_reordering";

/// Replication notifier contract.
pub trait SyncRepository {
    /// Records that one entity row changed.
    fn add_entity_sync(&self, entity_name: &str, entity_id: &str) -> RepoResult<()>;
    /// Records that the child order under `parent_note_id` changed.
    fn add_note_reordering_sync(&self, parent_note_id: &str) -> RepoResult<()> {
        self.add_entity_sync(NOTE_REORDERING_ENTITY, parent_note_id)
    }
}

impl SyncRepository for SqliteStore<'_> {
    fn add_entity_sync(&self, entity_name: &str, entity_id: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO sync (entity_name, entity_id, sync_date)
             VALUES (?1, ?2, strftime('%Y-%m-%d %H:%M:%fZ', 'now'));",
            params![entity_name, entity_id],
        )?;
        Ok(())
    }
}
