//! Note/branch lifecycle engine for a hierarchical knowledge base.
//!
//! This crate owns the invariants of note placement, revision snapshots,
//! image reference tracking, protection propagation and soft deletion.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{init_logging, logging_status, LogLevel};
pub use model::branch::{Branch, BranchId};
pub use model::label::{Label, DISABLE_VERSIONING_LABEL};
pub use model::note::{Note, NoteId, NoteType};
pub use model::note_image::NoteImage;
pub use model::revision::{NoteRevision, NoteRevisionId};
pub use model::ROOT_NOTE_ID;
pub use repo::{
    BranchRepository, LabelRepository, NoteImageRepository, NoteRepository, NoteStore,
    OptionRepository, RepoError, RepoResult, RevisionRepository, SqliteStore, SyncRepository,
    Transactional,
};
pub use service::deletion::{delete_note, DeletionReport};
pub use service::error::{NoteServiceError, ServiceResult};
pub use service::image_tracker::{referenced_image_ids, sync_note_images, ImageSyncReport};
pub use service::note_service::{
    CreatedNote, ExtraNoteOptions, NewNoteOptions, NoteBody, NoteService, NoteUpdate,
};
pub use service::placement::{allocate_note_position, Placement};
pub use service::protection::{protect_note, protect_note_recursively, protect_note_revisions};
pub use service::revision_policy::{
    save_revision_if_needed, RevisionSettings, SNAPSHOT_INTERVAL_OPTION,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
