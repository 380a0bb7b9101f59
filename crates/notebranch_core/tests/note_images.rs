use chrono::{TimeZone, Utc};
use notebranch_core::db::open_db_in_memory;
use notebranch_core::{
    sync_note_images, FixedClock, NewNoteOptions, NoteImageRepository, NoteService, NoteType,
    NoteUpdate, SqliteStore, ROOT_NOTE_ID,
};
use rusqlite::Connection;

fn setup() -> (Connection, FixedClock) {
    let conn = open_db_in_memory().unwrap();
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
    (conn, clock)
}

fn with_content(html: &str) -> NoteUpdate {
    NoteUpdate {
        content: Some(html.as_bytes().to_vec()),
        ..NoteUpdate::default()
    }
}

fn image_rows(conn: &Connection, note_id: &str) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM note_images WHERE note_id = ?1;",
        [note_id],
        |row| row.get(0),
    )
    .unwrap()
}

fn active_image_ids(service_store: &SqliteStore<'_>, note_id: &str) -> Vec<String> {
    let mut ids: Vec<String> = service_store
        .list_note_images(note_id)
        .unwrap()
        .into_iter()
        .map(|record| record.image_id)
        .collect();
    ids.sort();
    ids
}

#[test]
fn update_tracks_each_referenced_image_once() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let note = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("gallery"))
        .unwrap()
        .note;

    service
        .update_note(
            &note.note_id,
            with_content(
                r#"<img src="/api/images/img1/a.png"><img src="/api/images/img2/b.png"><img src="/api/images/img1/a.png">"#,
            ),
        )
        .unwrap();

    assert_eq!(
        active_image_ids(service.store(), &note.note_id),
        vec!["img1".to_string(), "img2".to_string()]
    );
    assert_eq!(image_rows(&conn, &note.note_id), 2);
}

#[test]
fn unchanged_content_performs_no_image_writes() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let note = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("gallery"))
        .unwrap()
        .note;
    let html = r#"<p><img src="/api/images/img1/a.png"></p>"#;

    let updated = service.update_note(&note.note_id, with_content(html)).unwrap();
    let store = service.store();
    let sync_before: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sync WHERE entity_name = 'note_images';",
            [],
            |row| row.get(0),
        )
        .unwrap();

    let report = sync_note_images(store, &clock, &updated).unwrap();
    assert!(report.is_noop());
    let sync_after: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sync WHERE entity_name = 'note_images';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(sync_after, sync_before);
    assert_eq!(image_rows(&conn, &note.note_id), 1);
}

#[test]
fn dropped_reference_is_soft_deleted_and_readding_creates_new_record() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let note = service
        .create_new_note(ROOT_NOTE_ID, NewNoteOptions::new("gallery"))
        .unwrap()
        .note;

    service
        .update_note(
            &note.note_id,
            with_content(r#"<img src="/api/images/img1/a.png"><img src="/api/images/img2/b.png">"#),
        )
        .unwrap();
    service
        .update_note(
            &note.note_id,
            with_content(r#"<img src="/api/images/img2/b.png">"#),
        )
        .unwrap();

    assert_eq!(
        active_image_ids(service.store(), &note.note_id),
        vec!["img2".to_string()]
    );
    let deleted: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM note_images
             WHERE note_id = ?1 AND image_id = 'img1' AND is_deleted = 1;",
            [&note.note_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(deleted, 1);

    service
        .update_note(
            &note.note_id,
            with_content(r#"<img src="/api/images/img1/a.png"><img src="/api/images/img2/b.png">"#),
        )
        .unwrap();
    assert_eq!(
        active_image_ids(service.store(), &note.note_id),
        vec!["img1".to_string(), "img2".to_string()]
    );
    assert_eq!(image_rows(&conn, &note.note_id), 3);
}

#[test]
fn non_text_notes_are_not_tracked() {
    let (conn, clock) = setup();
    let service = NoteService::with_clock(SqliteStore::new(&conn), &clock);
    let note = service
        .create_new_note(
            ROOT_NOTE_ID,
            NewNoteOptions {
                note_type: Some(NoteType::Code),
                mime: Some("text/html".to_string()),
                ..NewNoteOptions::new("template")
            },
        )
        .unwrap()
        .note;

    service
        .update_note(
            &note.note_id,
            with_content(r#"<img src="/api/images/img1/a.png">"#),
        )
        .unwrap();
    assert_eq!(image_rows(&conn, &note.note_id), 0);
}
