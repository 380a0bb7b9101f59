//! Domain model for notes and their placements.
//!
//! # Responsibility
//! - Define the entity records the lifecycle services operate on.
//! - Own identifier generation and canonical timestamp encoding.
//!
//! # Invariants
//! - Every entity is identified by an opaque, never-reused string id.
//! - Deletion is represented by soft-delete flags, never physical removal.
//! - Timestamps are fixed-width strings whose lexical order is chronological.

pub mod branch;
pub mod label;
pub mod note;
pub mod note_image;
pub mod revision;
pub mod timestamp;

use uuid::Uuid;

/// Identifier of the hierarchy root note.
pub const ROOT_NOTE_ID: &str = "root";

/// Generates a fresh opaque entity identifier.
pub fn new_entity_id() -> String {
    Uuid::new_v4().simple().to_string()
}
