use notebranch_core::db::migrations::latest_version;
use notebranch_core::db::{open_db, open_db_in_memory, DbError};
use notebranch_core::{OptionRepository, SqliteStore, ROOT_NOTE_ID, SNAPSHOT_INTERVAL_OPTION};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in [
        "notes",
        "branches",
        "note_revisions",
        "note_images",
        "labels",
        "options",
        "sync",
    ] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn fresh_database_is_seeded_with_root_and_interval_option() {
    let conn = open_db_in_memory().unwrap();

    let root_title: String = conn
        .query_row(
            "SELECT title FROM notes WHERE note_id = ?1;",
            [ROOT_NOTE_ID],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(root_title, "root");

    let store = SqliteStore::new(&conn);
    assert_eq!(
        store.get_option(SNAPSHOT_INTERVAL_OPTION).unwrap().as_deref(),
        Some("600")
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebranch.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let roots: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(roots, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
