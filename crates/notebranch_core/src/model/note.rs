//! Note entity.
//!
//! # Invariants
//! - `note_id` is immutable once created.
//! - `note_type` and `mime` are fixed at creation.
//! - `is_deleted` is the source of truth for tombstone state.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Stable note identifier.
pub type NoteId = String;

/// Content kind discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteType {
    /// Rich text (HTML) note.
    Text,
    /// Source code or structured text.
    Code,
    /// Rendered HTML view.
    Render,
    /// Attachment whose content is a binary payload.
    File,
    /// Saved search.
    Search,
    /// Relation map diagram.
    RelationMap,
}

impl NoteType {
    /// Storage/wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Render => "render",
            Self::File => "file",
            Self::Search => "search",
            Self::RelationMap => "relation-map",
        }
    }

    /// Parses a storage/wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "code" => Some(Self::Code),
            "render" => Some(Self::Render),
            "file" => Some(Self::File),
            "search" => Some(Self::Search),
            "relation-map" => Some(Self::RelationMap),
            _ => None,
        }
    }
}

/// One content item, independent of where it is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub note_id: NoteId,
    pub title: String,
    /// Text for most types; raw payload bytes for `File`.
    pub content: Vec<u8>,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub mime: String,
    /// Encryption flag, mirrored onto the note's revisions.
    pub is_protected: bool,
    pub is_deleted: bool,
    pub date_created: String,
    pub date_modified: String,
}

impl Note {
    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn content_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}
