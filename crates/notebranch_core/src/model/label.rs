//! Name/value label attached to a note.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

/// Label that turns off revision snapshots when set to `"true"`.
pub const DISABLE_VERSIONING_LABEL: &str = "disable_versioning";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub label_id: String,
    pub note_id: NoteId,
    pub name: String,
    pub value: String,
    pub is_deleted: bool,
    pub date_created: String,
}
