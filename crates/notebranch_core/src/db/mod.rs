//! SQLite storage bootstrap, schema migrations and transaction scopes.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the note store.
//! - Apply schema migrations in deterministic order.
//! - Provide nestable all-or-nothing write scopes.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write application data before migrations succeed.
//! - A failed scope leaves no partial writes visible to other connections.

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

const NESTED_SCOPE_NAME: &str = "notebranch_scope";

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Runs `body` as one atomic unit on `conn`.
///
/// Outside a transaction this opens `BEGIN IMMEDIATE`, so the write lock is
/// held before `body` performs its first read. Inside an enclosing scope it
/// uses a savepoint, so scopes nest and an inner failure only unwinds the
/// inner work.
///
/// # Errors
/// - Returns the error produced by `body`, after rolling the scope back.
/// - Returns a `DbError` (converted into `E`) when begin/commit fails.
pub fn with_transaction<T, E, F>(conn: &Connection, body: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<DbError>,
{
    if conn.is_autocommit() {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        // Dropping `tx` without commit rolls it back.
        let value = body()?;
        tx.commit().map_err(DbError::from)?;
        return Ok(value);
    }

    conn.execute_batch(&format!("SAVEPOINT {NESTED_SCOPE_NAME};"))
        .map_err(DbError::from)?;
    match body() {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {NESTED_SCOPE_NAME};"))
                .map_err(DbError::from)?;
            Ok(value)
        }
        Err(err) => {
            let _ = conn.execute_batch(&format!(
                "ROLLBACK TO {NESTED_SCOPE_NAME}; RELEASE {NESTED_SCOPE_NAME};"
            ));
            Err(err)
        }
    }
}
