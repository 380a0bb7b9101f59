//! Note lifecycle use-case service.
//!
//! # Responsibility
//! - Create notes together with their first placement.
//! - Apply field updates with revision snapshots, image tracking and
//!   revision protection alignment.
//! - Expose deletion and protection cascades as single transactions.
//!
//! # Invariants
//! - A note and its first branch become visible together or not at all.
//! - `file` note content is never replaced through `update_note`.
//! - `type`/`mime` are fixed at creation: explicit, inherited from a
//!   non-root parent, or defaulted to `text` / `text/html`.

use crate::clock::{Clock, SystemClock};
use crate::model::branch::Branch;
use crate::model::label::Label;
use crate::model::new_entity_id;
use crate::model::note::{Note, NoteId, NoteType};
use crate::model::ROOT_NOTE_ID;
use crate::repo::NoteStore;
use crate::service::deletion::{delete_note, DeletionReport};
use crate::service::error::{NoteServiceError, ServiceResult};
use crate::service::image_tracker::sync_note_images;
use crate::service::placement::{allocate_note_position, Placement};
use crate::service::protection::{protect_note_recursively, protect_note_revisions};
use crate::service::revision_policy::{save_revision_if_needed, RevisionSettings};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

const DEFAULT_MIME: &str = "text/html";
const JSON_MIME: &str = "application/json";

/// Input for [`NoteService::create_new_note`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNoteOptions {
    pub title: String,
    pub content: Vec<u8>,
    pub placement: Placement,
    /// Inherited from a non-root parent when `None`, else `text`.
    pub note_type: Option<NoteType>,
    /// Inherited from a non-root parent when `None`, else `text/html`.
    pub mime: Option<String>,
    pub is_protected: bool,
    pub is_expanded: bool,
}

impl NewNoteOptions {
    /// Empty note placed as the last child.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
            placement: Placement::Into,
            note_type: None,
            mime: None,
            is_protected: false,
            is_expanded: false,
        }
    }
}

/// Note and branch written by one creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNote {
    pub note: Note,
    pub branch: Branch,
}

/// Content accepted by [`NoteService::create_note`].
#[derive(Debug, Clone, PartialEq)]
pub enum NoteBody {
    Text(String),
    Json(serde_json::Value),
}

impl From<&str> for NoteBody {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NoteBody {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for NoteBody {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Optional settings for [`NoteService::create_note`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraNoteOptions {
    /// Store content as tab-indented JSON; defaults type to `code`.
    pub json: bool,
    pub note_type: Option<NoteType>,
    pub mime: Option<String>,
    pub is_protected: bool,
    /// Labels attached to the new note, applied in name order.
    pub labels: BTreeMap<String, String>,
}

/// Field-level update request. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    /// Ignored for `file` notes.
    pub content: Option<Vec<u8>>,
    pub is_protected: Option<bool>,
}

/// Note lifecycle facade over a [`NoteStore`].
pub struct NoteService<S: NoteStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a service reading wall-clock time.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: NoteStore, C: Clock> NoteService<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates a note and its placement under `parent_note_id`.
    ///
    /// # Errors
    /// - `ParentNoteNotFound` when a non-root parent does not exist.
    /// - Placement errors from [`allocate_note_position`].
    pub fn create_new_note(
        &self,
        parent_note_id: &str,
        options: NewNoteOptions,
    ) -> ServiceResult<CreatedNote> {
        let store = &self.store;
        let created = store.transaction(|| -> ServiceResult<CreatedNote> {
            let note_position = allocate_note_position(store, parent_note_id, &options.placement)?;

            let mut note_type = options.note_type;
            let mut mime = options.mime;
            if parent_note_id != ROOT_NOTE_ID {
                let parent = store
                    .get_note(parent_note_id)?
                    .ok_or_else(|| NoteServiceError::ParentNoteNotFound(parent_note_id.to_string()))?;
                note_type = note_type.or(Some(parent.note_type));
                mime = mime.or(Some(parent.mime));
            }

            let now = self.clock.now_string();
            let note = Note {
                note_id: new_entity_id(),
                title: options.title,
                content: options.content,
                note_type: note_type.unwrap_or(NoteType::Text),
                mime: mime.unwrap_or_else(|| DEFAULT_MIME.to_string()),
                is_protected: options.is_protected,
                is_deleted: false,
                date_created: now.clone(),
                date_modified: now.clone(),
            };
            store.insert_note(&note)?;

            let branch = Branch {
                branch_id: new_entity_id(),
                note_id: note.note_id.clone(),
                parent_note_id: parent_note_id.to_string(),
                note_position,
                is_expanded: options.is_expanded,
                is_deleted: false,
                date_modified: now,
            };
            store.insert_branch(&branch)?;

            Ok(CreatedNote { note, branch })
        })?;

        info!(
            "event=note_create module=note_service status=ok note_id={} branch_id={} position={}",
            created.note.note_id, created.branch.branch_id, created.branch.note_position
        );
        Ok(created)
    }

    /// Creates a note as the last child of `parent_note_id`.
    ///
    /// Returns the new note id.
    ///
    /// # Errors
    /// - `EmptyParentNoteId` / `EmptyTitle` before any write.
    pub fn create_note(
        &self,
        parent_note_id: &str,
        title: &str,
        content: impl Into<NoteBody>,
        extra: ExtraNoteOptions,
    ) -> ServiceResult<NoteId> {
        if parent_note_id.trim().is_empty() {
            return Err(NoteServiceError::EmptyParentNoteId);
        }
        if title.trim().is_empty() {
            return Err(NoteServiceError::EmptyTitle);
        }

        let content = render_body(content.into(), extra.json)?;
        let (note_type, mime) = match extra.note_type {
            Some(note_type) => (Some(note_type), extra.mime),
            None if extra.json => (Some(NoteType::Code), Some(JSON_MIME.to_string())),
            None => (Some(NoteType::Text), Some(DEFAULT_MIME.to_string())),
        };

        let options = NewNoteOptions {
            title: title.to_string(),
            content,
            placement: Placement::Into,
            note_type,
            mime,
            is_protected: extra.is_protected,
            is_expanded: false,
        };

        let store = &self.store;
        store.transaction(|| -> ServiceResult<NoteId> {
            let created = self.create_new_note(parent_note_id, options)?;
            for (name, value) in &extra.labels {
                self.create_label(&created.note.note_id, name, value)?;
            }
            Ok(created.note.note_id)
        })
    }

    /// Applies `update` to one note.
    ///
    /// Order: snapshot pre-update state if due, apply fields, persist,
    /// reconcile image references, align revision protection.
    pub fn update_note(&self, note_id: &str, update: NoteUpdate) -> ServiceResult<Note> {
        let store = &self.store;
        let note = store.transaction(|| -> ServiceResult<Note> {
            let mut note = store
                .get_note(note_id)?
                .ok_or_else(|| NoteServiceError::NoteNotFound(note_id.to_string()))?;

            let settings = RevisionSettings::load(store)?;
            save_revision_if_needed(store, &self.clock, &note, &settings)?;

            if let Some(title) = update.title {
                note.title = title;
            }
            if note.note_type != NoteType::File {
                if let Some(content) = update.content {
                    note.content = content;
                }
            }
            if let Some(is_protected) = update.is_protected {
                note.is_protected = is_protected;
            }
            note.date_modified = self.clock.now_string();
            store.update_note(&note)?;

            sync_note_images(store, &self.clock, &note)?;
            protect_note_revisions(store, &note)?;
            Ok(note)
        })?;

        info!("event=note_update module=note_service status=ok note_id={note_id}");
        Ok(note)
    }

    /// Loads one note, including soft-deleted notes.
    pub fn get_note(&self, note_id: &str) -> ServiceResult<Option<Note>> {
        Ok(self.store.get_note(note_id)?)
    }

    /// Active child placements of `parent_note_id` in sibling order.
    pub fn child_branches(&self, parent_note_id: &str) -> ServiceResult<Vec<Branch>> {
        Ok(self.store.list_child_branches(parent_note_id)?)
    }

    /// Soft-deletes one placement by id and cascades.
    ///
    /// An unknown or already-deleted branch is a no-op.
    pub fn delete_branch(&self, branch_id: &str) -> ServiceResult<DeletionReport> {
        let store = &self.store;
        store.transaction(|| -> ServiceResult<DeletionReport> {
            let branch = store.get_branch(branch_id)?;
            delete_note(store, &self.clock, branch)
        })
    }

    /// Sets protection on a note and everything reachable below it.
    ///
    /// Returns the number of distinct notes visited.
    pub fn protect_subtree(&self, note_id: &str, protect: bool) -> ServiceResult<usize> {
        let note = self
            .store
            .get_note(note_id)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(note_id.to_string()))?;
        protect_note_recursively(&self.store, note, protect)
    }

    /// Attaches a `name = value` label to a note.
    pub fn create_label(&self, note_id: &str, name: &str, value: &str) -> ServiceResult<Label> {
        let label = Label {
            label_id: new_entity_id(),
            note_id: note_id.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            is_deleted: false,
            date_created: self.clock.now_string(),
        };
        self.store.insert_label(&label)?;
        Ok(label)
    }
}

fn render_body(body: NoteBody, json: bool) -> ServiceResult<Vec<u8>> {
    if !json {
        return match body {
            NoteBody::Text(text) => Ok(text.into_bytes()),
            NoteBody::Json(value) => Ok(serde_json::to_vec(&value)?),
        };
    }

    let value = match body {
        NoteBody::Text(text) => serde_json::Value::String(text),
        NoteBody::Json(value) => value,
    };
    let mut rendered = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut rendered, formatter);
    value.serialize(&mut serializer)?;
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::{render_body, NoteBody};
    use serde_json::json;

    #[test]
    fn json_body_is_tab_indented() {
        let rendered = render_body(NoteBody::Json(json!({"a": [1]})), true).unwrap();
        assert_eq!(
            String::from_utf8(rendered).unwrap(),
            "{\n\t\"a\": [\n\t\t1\n\t]\n}"
        );
    }

    #[test]
    fn text_body_is_stored_verbatim_without_json_flag() {
        let rendered = render_body(NoteBody::from("<p>hi</p>"), false).unwrap();
        assert_eq!(rendered, b"<p>hi</p>".to_vec());
    }

    #[test]
    fn text_body_becomes_json_string_with_json_flag() {
        let rendered = render_body(NoteBody::from("hi"), true).unwrap();
        assert_eq!(rendered, b"\"hi\"".to_vec());
    }
}
