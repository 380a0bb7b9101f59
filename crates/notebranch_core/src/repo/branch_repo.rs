//! Branch (placement) persistence and sibling position queries.
//!
//! # Invariants
//! - Position queries consider active (`is_deleted=0`) branches only.
//! - `shift_note_positions_after` leaves `date_modified` untouched and
//!   records no per-row sync entries.

use crate::model::branch::Branch;
use crate::repo::sync_repo::SyncRepository;
use crate::repo::{bool_to_int, read_flag, RepoError, RepoResult, SqliteStore};
use rusqlite::{params, Row};

const BRANCH_SELECT_SQL: &str = "SELECT
    branch_id,
    note_id,
    parent_note_id,
    note_position,
    is_expanded,
    is_deleted,
    date_modified
FROM branches";

/// Branch repository contract.
pub trait BranchRepository {
    /// Loads one branch by id, including soft-deleted branches.
    fn get_branch(&self, branch_id: &str) -> RepoResult<Option<Branch>>;
    /// Inserts a new branch row.
    fn insert_branch(&self, branch: &Branch) -> RepoResult<()>;
    /// Persists every mutable field of an existing branch.
    fn update_branch(&self, branch: &Branch) -> RepoResult<()>;
    /// Lists active placements of `note_id`.
    fn list_note_branches(&self, note_id: &str) -> RepoResult<Vec<Branch>>;
    /// Lists active branches under `parent_note_id` in sibling order.
    fn list_child_branches(&self, parent_note_id: &str) -> RepoResult<Vec<Branch>>;
    /// Highest active sibling position, or `None` without active children.
    fn max_note_position(&self, parent_note_id: &str) -> RepoResult<Option<i64>>;
    /// Adds one to every active sibling position greater than `position`.
    ///
    /// Returns the number of shifted branches.
    fn shift_note_positions_after(&self, parent_note_id: &str, position: i64)
        -> RepoResult<usize>;
}

impl BranchRepository for SqliteStore<'_> {
    fn get_branch(&self, branch_id: &str) -> RepoResult<Option<Branch>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BRANCH_SELECT_SQL} WHERE branch_id = ?1;"))?;
        let mut rows = stmt.query([branch_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_branch_row(row)?));
        }
        Ok(None)
    }

    fn insert_branch(&self, branch: &Branch) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO branches (
                branch_id,
                note_id,
                parent_note_id,
                note_position,
                is_expanded,
                is_deleted,
                date_modified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                branch.branch_id,
                branch.note_id,
                branch.parent_note_id,
                branch.note_position,
                bool_to_int(branch.is_expanded),
                bool_to_int(branch.is_deleted),
                branch.date_modified,
            ],
        )?;
        self.add_entity_sync("branches", &branch.branch_id)
    }

    fn update_branch(&self, branch: &Branch) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE branches
             SET
                note_id = ?2,
                parent_note_id = ?3,
                note_position = ?4,
                is_expanded = ?5,
                is_deleted = ?6,
                date_modified = ?7
             WHERE branch_id = ?1;",
            params![
                branch.branch_id,
                branch.note_id,
                branch.parent_note_id,
                branch.note_position,
                bool_to_int(branch.is_expanded),
                bool_to_int(branch.is_deleted),
                branch.date_modified,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "branch",
                id: branch.branch_id.clone(),
            });
        }
        self.add_entity_sync("branches", &branch.branch_id)
    }

    fn list_note_branches(&self, note_id: &str) -> RepoResult<Vec<Branch>> {
        query_branches(
            self,
            &format!(
                "{BRANCH_SELECT_SQL}
                 WHERE note_id = ?1
                   AND is_deleted = 0
                 ORDER BY branch_id ASC;"
            ),
            note_id,
        )
    }

    fn list_child_branches(&self, parent_note_id: &str) -> RepoResult<Vec<Branch>> {
        query_branches(
            self,
            &format!(
                "{BRANCH_SELECT_SQL}
                 WHERE parent_note_id = ?1
                   AND is_deleted = 0
                 ORDER BY note_position ASC, branch_id ASC;"
            ),
            parent_note_id,
        )
    }

    fn max_note_position(&self, parent_note_id: &str) -> RepoResult<Option<i64>> {
        let max = self.conn.query_row(
            "SELECT MAX(note_position)
             FROM branches
             WHERE parent_note_id = ?1
               AND is_deleted = 0;",
            [parent_note_id],
            |row| row.get::<_, Option<i64>>(0),
        )?;
        Ok(max)
    }

    fn shift_note_positions_after(
        &self,
        parent_note_id: &str,
        position: i64,
    ) -> RepoResult<usize> {
        let shifted = self.conn.execute(
            "UPDATE branches
             SET note_position = note_position + 1
             WHERE parent_note_id = ?1
               AND note_position > ?2
               AND is_deleted = 0;",
            params![parent_note_id, position],
        )?;
        Ok(shifted)
    }
}

fn query_branches(store: &SqliteStore<'_>, sql: &str, key: &str) -> RepoResult<Vec<Branch>> {
    let mut stmt = store.conn.prepare(sql)?;
    let mut rows = stmt.query([key])?;
    let mut branches = Vec::new();
    while let Some(row) = rows.next()? {
        branches.push(parse_branch_row(row)?);
    }
    Ok(branches)
}

fn parse_branch_row(row: &Row<'_>) -> RepoResult<Branch> {
    Ok(Branch {
        branch_id: row.get("branch_id")?,
        note_id: row.get("note_id")?,
        parent_note_id: row.get("parent_note_id")?,
        note_position: row.get("note_position")?,
        is_expanded: read_flag(row, "is_expanded", "branches")?,
        is_deleted: read_flag(row, "is_deleted", "branches")?,
        date_modified: row.get("date_modified")?,
    })
}
