//! Repository layer contracts and SQLite persistence.
//!
//! # Responsibility
//! - Define narrow, use-case oriented data access contracts.
//! - Isolate SQL details from lifecycle orchestration.
//! - Record one replication (`sync`) entry per persisted entity write.
//!
//! # Invariants
//! - Deletions are soft: repositories never issue `DELETE` for entities.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Bulk position shifts write no per-row sync entries.

pub mod branch_repo;
pub mod image_repo;
pub mod label_repo;
pub mod note_repo;
pub mod option_repo;
pub mod revision_repo;
pub mod sync_repo;

use crate::db::{with_transaction, DbError};
use rusqlite::{Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use branch_repo::BranchRepository;
pub use image_repo::NoteImageRepository;
pub use label_repo::LabelRepository;
pub use note_repo::NoteRepository;
pub use option_repo::OptionRepository;
pub use revision_repo::RevisionRepository;
pub use sync_repo::SyncRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Update target row does not exist.
    NotFound { entity: &'static str, id: String },
    /// Persisted data cannot be converted to a valid entity.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs a closure as one atomic storage unit.
pub trait Transactional {
    fn transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DbError>;
}

/// Every collaborator contract the lifecycle services consume.
pub trait NoteStore:
    NoteRepository
    + BranchRepository
    + RevisionRepository
    + NoteImageRepository
    + LabelRepository
    + OptionRepository
    + SyncRepository
    + Transactional
{
}

impl<T> NoteStore for T where
    T: NoteRepository
        + BranchRepository
        + RevisionRepository
        + NoteImageRepository
        + LabelRepository
        + OptionRepository
        + SyncRepository
        + Transactional
{
}

/// SQLite-backed store over one migrated connection.
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a store over a connection returned by `db::open_db*`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Underlying connection.
    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }
}

impl Transactional for SqliteStore<'_> {
    fn transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<DbError>,
    {
        with_transaction(self.conn, body)
    }
}

pub(crate) fn read_flag(row: &Row<'_>, column: &'static str, table: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in {table}.{column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}
