//! Embedded image reference tracking for text notes.
//!
//! # Invariants
//! - After a sync, the active tracking records of a text note are exactly
//!   the distinct image ids referenced by its content.
//! - Records for still-referenced images are never rewritten, so a sync
//!   over unchanged content performs no writes.

use crate::clock::Clock;
use crate::model::new_entity_id;
use crate::model::note::{Note, NoteType};
use crate::model::note_image::NoteImage;
use crate::repo::NoteImageRepository;
use crate::service::error::ServiceResult;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static IMAGE_REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"src="/api/images/([a-zA-Z0-9]+)/"#).expect("valid image reference regex")
});

/// Changes applied by one [`sync_note_images`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSyncReport {
    /// Image ids that received a new tracking record.
    pub added: Vec<String>,
    /// Image ids whose tracking record was marked deleted.
    pub removed: Vec<String>,
}

impl ImageSyncReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Distinct image ids referenced by HTML content, in sorted order.
pub fn referenced_image_ids(content: &str) -> BTreeSet<String> {
    IMAGE_REFERENCE_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Reconciles tracking records of `note` with the images its content references.
///
/// Non-text notes are left untouched.
pub fn sync_note_images<S, C>(store: &S, clock: &C, note: &Note) -> ServiceResult<ImageSyncReport>
where
    S: NoteImageRepository,
    C: Clock,
{
    let mut report = ImageSyncReport::default();
    if note.note_type != NoteType::Text {
        return Ok(report);
    }

    let found = referenced_image_ids(&note.content_text());
    let existing = store.list_note_images(&note.note_id)?;
    let now = clock.now_string();

    for image_id in &found {
        if existing.iter().any(|record| &record.image_id == image_id) {
            continue;
        }
        store.insert_note_image(&NoteImage {
            note_image_id: new_entity_id(),
            note_id: note.note_id.clone(),
            image_id: image_id.clone(),
            is_deleted: false,
            date_created: now.clone(),
            date_modified: now.clone(),
        })?;
        report.added.push(image_id.clone());
    }

    for mut record in existing {
        if found.contains(&record.image_id) {
            continue;
        }
        record.is_deleted = true;
        record.date_modified = now.clone();
        store.update_note_image(&record)?;
        report.removed.push(record.image_id);
    }

    if !report.is_noop() {
        debug!(
            "event=note_images_sync module=image_tracker note_id={} added={} removed={}",
            note.note_id,
            report.added.len(),
            report.removed.len()
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::referenced_image_ids;

    #[test]
    fn extracts_distinct_image_ids() {
        let content = r#"<p><img src="/api/images/abc123/photo.png"></p>
            <img src="/api/images/Zz9/x.jpg"><img src="/api/images/abc123/photo.png">"#;
        let ids: Vec<String> = referenced_image_ids(content).into_iter().collect();
        assert_eq!(ids, vec!["Zz9".to_string(), "abc123".to_string()]);
    }

    #[test]
    fn ignores_non_matching_references() {
        let content = r#"<img src="/images/abc/x.png"><img src="/api/images/a-b/x.png">
            <a href="/api/images/abc/x.png">link</a>"#;
        assert!(referenced_image_ids(content).is_empty());
    }
}
