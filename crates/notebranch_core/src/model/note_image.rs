//! Tracked reference from a text note to an embedded image.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteImage {
    pub note_image_id: String,
    pub note_id: NoteId,
    pub image_id: String,
    pub is_deleted: bool,
    pub date_created: String,
    pub date_modified: String,
}
