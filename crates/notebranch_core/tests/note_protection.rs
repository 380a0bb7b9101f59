use chrono::{TimeZone, Utc};
use notebranch_core::db::open_db_in_memory;
use notebranch_core::model::new_entity_id;
use notebranch_core::{
    protect_note, Branch, BranchRepository, Clock, FixedClock, NewNoteOptions, Note,
    NoteRepository, NoteRevision, NoteService, NoteServiceError, RevisionRepository,
    SqliteStore, ROOT_NOTE_ID,
};
use rusqlite::Connection;

fn setup() -> (Connection, FixedClock) {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    (conn, clock)
}

fn add_revision(store: &SqliteStore<'_>, clock: &FixedClock, note: &Note) {
    store
        .insert_revision(&NoteRevision {
            note_revision_id: new_entity_id(),
            note_id: note.note_id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            is_protected: note.is_protected,
            date_modified_from: note.date_modified.clone(),
            date_modified_to: clock.now_string(),
        })
        .unwrap();
}

fn add_placement(store: &SqliteStore<'_>, clock: &FixedClock, note_id: &str, parent_note_id: &str) {
    store
        .insert_branch(&Branch {
            branch_id: new_entity_id(),
            note_id: note_id.to_string(),
            parent_note_id: parent_note_id.to_string(),
            note_position: 100,
            is_expanded: false,
            is_deleted: false,
            date_modified: clock.now_string(),
        })
        .unwrap();
}

fn is_protected(store: &SqliteStore<'_>, note_id: &str) -> bool {
    store.get_note(note_id).unwrap().unwrap().is_protected
}

fn note_sync_count(conn: &Connection, note_id: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM sync WHERE entity_name = 'notes' AND entity_id = ?1;",
        [note_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn protect_subtree_covers_descendants_and_their_revisions() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let store = service.store();

    let a = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("a"))
        .unwrap()
        .note;
    let b = service
        .create_new_note(&a.note_id, NewNoteOptions::new("b"))
        .unwrap()
        .note;
    let outside = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("outside"))
        .unwrap()
        .note;
    add_revision(store, &clock, &a);
    add_revision(store, &clock, &b);

    let visited = service.protect_subtree(&a.note_id, true).unwrap();
    assert_eq!(visited, 2);
    assert!(is_protected(store, &a.note_id));
    assert!(is_protected(store, &b.note_id));
    assert!(!is_protected(store, &outside.note_id));
    for note_id in [&a.note_id, &b.note_id] {
        assert!(store
            .list_note_revisions(note_id)
            .unwrap()
            .iter()
            .all(|revision| revision.is_protected));
    }

    service.protect_subtree(&a.note_id, false).unwrap();
    assert!(!is_protected(store, &b.note_id));
    assert!(store
        .list_note_revisions(&b.note_id)
        .unwrap()
        .iter()
        .all(|revision| !revision.is_protected));
}

#[test]
fn shared_child_is_visited_once() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let store = service.store();

    let a = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("a"))
        .unwrap()
        .note;
    let b = service
        .create_new_note(&a.note_id, NewNoteOptions::new("b"))
        .unwrap()
        .note;
    let shared = service
        .create_new_note(&a.note_id, NewNoteOptions::new("shared"))
        .unwrap()
        .note;
    add_placement(store, &clock, &shared.note_id, &b.note_id);

    let visited = service.protect_subtree(&a.note_id, true).unwrap();
    assert_eq!(visited, 3);
    assert!(is_protected(store, &shared.note_id));
    assert_eq!(note_sync_count(&conn, &shared.note_id), 2);
}

#[test]
fn placement_cycle_terminates() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let store = service.store();

    let a = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("a"))
        .unwrap()
        .note;
    let b = service
        .create_new_note(&a.note_id, NewNoteOptions::new("b"))
        .unwrap()
        .note;
    add_placement(store, &clock, &a.note_id, &b.note_id);

    let visited = service.protect_subtree(&a.note_id, true).unwrap();
    assert_eq!(visited, 2);
    assert!(is_protected(store, &a.note_id));
    assert!(is_protected(store, &b.note_id));
}

#[test]
fn unchanged_flag_writes_nothing() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let store = service.store();

    let mut note = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("plain"))
        .unwrap()
        .note;
    let before = note_sync_count(&conn, &note.note_id);

    let changed = protect_note(store, &mut note, false).unwrap();
    assert!(!changed);
    assert_eq!(note_sync_count(&conn, &note.note_id), before);

    let changed = protect_note(store, &mut note, true).unwrap();
    assert!(changed);
    assert!(note.is_protected);
    assert_eq!(note_sync_count(&conn, &note.note_id), before + 1);
}

#[test]
fn protect_subtree_of_unknown_note_fails() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);

    let err = service.protect_subtree("ghost", true).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(_)));
}
