//! Point-in-time snapshot of a note's title and content.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Stable revision identifier.
pub type NoteRevisionId = String;

/// Immutable snapshot; only `is_protected` follows the owning note afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRevision {
    pub note_revision_id: NoteRevisionId,
    pub note_id: NoteId,
    pub title: String,
    pub content: Vec<u8>,
    pub is_protected: bool,
    /// `date_modified` of the note when the snapshotted state was written.
    pub date_modified_from: String,
    /// Moment the snapshot was taken.
    pub date_modified_to: String,
}
