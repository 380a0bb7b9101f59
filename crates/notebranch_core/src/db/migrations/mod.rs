//! Schema migrations for the note store.
//!
//! The schema version lives in `PRAGMA user_version`. Every pending step
//! runs inside one transaction, so a database is either at its previous
//! version or fully upgraded.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step, identified by the version it upgrades to.
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "notes_branches_revisions",
    sql: include_str!("0001_init.sql"),
}];

/// Highest schema version this build can open.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if found > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SCHEMA_STEPS;

    #[test]
    fn schema_steps_are_strictly_increasing() {
        assert!(SCHEMA_STEPS
            .windows(2)
            .all(|pair| pair[0].version < pair[1].version));
        assert!(SCHEMA_STEPS.first().is_some_and(|step| step.version == 1));
    }
}
