//! Branch entity: one placement of a note under a parent.
//!
//! # Invariants
//! - Among active branches of one parent, `note_position` values are unique.
//! - Deleted branches carry no ordering constraint.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Stable branch identifier.
pub type BranchId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub branch_id: BranchId,
    pub note_id: NoteId,
    pub parent_note_id: NoteId,
    /// Sibling display order within `parent_note_id`.
    pub note_position: i64,
    pub is_expanded: bool,
    pub is_deleted: bool,
    pub date_modified: String,
}
