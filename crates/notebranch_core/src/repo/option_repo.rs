//! Persistent configuration store (`options` table).

use crate::repo::sync_repo::SyncRepository;
use crate::repo::{RepoResult, SqliteStore};
use rusqlite::{params, OptionalExtension};

/// Configuration store contract.
pub trait OptionRepository {
    /// Reads one option value, `None` when never set.
    fn get_option(&self, name: &str) -> RepoResult<Option<String>>;
    /// Creates or replaces one option value.
    fn set_option(&self, name: &str, value: &str) -> RepoResult<()>;
}

impl OptionRepository for SqliteStore<'_> {
    fn get_option(&self, name: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM options WHERE name = ?1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_option(&self, name: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO options (name, value, date_modified)
             VALUES (?1, ?2, strftime('%Y-%m-%d %H:%M:%fZ', 'now'))
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                date_modified = excluded.date_modified;",
            params![name, value],
        )?;
        self.add_entity_sync("options", name)
    }
}
