//! Service-level error for note lifecycle use-cases.

use crate::db::DbError;
use crate::model::branch::BranchId;
use crate::model::note::NoteId;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, NoteServiceError>;

#[derive(Debug)]
pub enum NoteServiceError {
    /// Parent note id is blank.
    EmptyParentNoteId,
    /// Note title is blank.
    EmptyTitle,
    /// Placement target is neither `into` nor `after`.
    UnknownPlacementTarget(String),
    /// `after` placement without a reference branch id.
    MissingTargetBranchId,
    /// Reference branch for `after` placement is missing or deleted.
    TargetBranchNotFound(BranchId),
    /// Reference branch for `after` placement sits under another parent.
    TargetBranchParentMismatch {
        branch_id: BranchId,
        parent_note_id: NoteId,
    },
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Parent note does not exist.
    ParentNoteNotFound(NoteId),
    /// Required configuration option is absent.
    MissingOption(&'static str),
    /// Configuration option holds an unusable value.
    InvalidOption { name: &'static str, value: String },
    /// Stored timestamp is not in canonical encoding.
    InvalidTimestamp { note_id: NoteId, value: String },
    /// Structured content could not be serialized.
    Json(serde_json::Error),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyParentNoteId => write!(f, "parent note id must not be empty"),
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::UnknownPlacementTarget(value) => {
                write!(f, "unknown placement target: `{value}`")
            }
            Self::MissingTargetBranchId => {
                write!(f, "placement `after` requires a target branch id")
            }
            Self::TargetBranchNotFound(id) => write!(f, "target branch not found: {id}"),
            Self::TargetBranchParentMismatch {
                branch_id,
                parent_note_id,
            } => write!(
                f,
                "target branch {branch_id} is not a child of note {parent_note_id}"
            ),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::ParentNoteNotFound(id) => write!(f, "parent note not found: {id}"),
            Self::MissingOption(name) => write!(f, "option `{name}` is not set"),
            Self::InvalidOption { name, value } => {
                write!(f, "option `{name}` has invalid value `{value}`")
            }
            Self::InvalidTimestamp { note_id, value } => {
                write!(f, "note {note_id} has invalid timestamp `{value}`")
            }
            Self::Json(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for NoteServiceError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<serde_json::Error> for NoteServiceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl NoteServiceError {
    /// Whether this error was raised by input validation rather than storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyParentNoteId
                | Self::EmptyTitle
                | Self::UnknownPlacementTarget(_)
                | Self::MissingTargetBranchId
                | Self::TargetBranchNotFound(_)
                | Self::TargetBranchParentMismatch { .. }
        )
    }
}
