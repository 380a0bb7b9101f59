//! CLI smoke entry point.
//!
//! # Responsibility
//! - Run one create/update/delete lifecycle against a real store.
//! - Keep output deterministic in shape for quick local sanity checks.
//!
//! Usage: `notebranch_cli [DB_PATH]`. Without a path an in-memory database
//! is used.

use notebranch_core::db::{open_db, open_db_in_memory};
use notebranch_core::{
    core_version, ExtraNoteOptions, NoteService, NoteUpdate, SqliteStore, ROOT_NOTE_ID,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let conn = match std::env::args().nth(1) {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = NoteService::new(SqliteStore::new(&conn));

    println!("notebranch_core version={}", core_version());

    let note_id = service.create_note(
        ROOT_NOTE_ID,
        "smoke probe",
        r#"<p><img src="/api/images/probe1/probe.png"></p>"#,
        ExtraNoteOptions::default(),
    )?;
    println!("created note_id={note_id}");

    let updated = service.update_note(
        &note_id,
        NoteUpdate {
            title: Some("smoke probe (edited)".to_string()),
            ..NoteUpdate::default()
        },
    )?;
    println!("updated note_id={} title={:?}", updated.note_id, updated.title);

    let branches = service.child_branches(ROOT_NOTE_ID)?;
    let Some(branch) = branches.iter().find(|branch| branch.note_id == note_id) else {
        return Err(format!("no placement found for note {note_id}").into());
    };
    let report = service.delete_branch(&branch.branch_id)?;
    println!(
        "deleted branches={} notes={}",
        report.deleted_branch_ids.len(),
        report.deleted_note_ids.len()
    );
    Ok(())
}
