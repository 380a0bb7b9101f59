//! Revision snapshot policy.
//!
//! Decides, before an update is applied, whether the note's current state
//! must be captured as a [`NoteRevision`].
//!
//! # Invariants
//! - No snapshot for `file` notes or notes labelled `disable_versioning=true`.
//! - At most one snapshot per note within the configured interval.
//! - No snapshot for notes younger than the configured interval.
//! - New snapshots start unprotected; protection propagation fixes the flag.

use crate::clock::Clock;
use crate::model::label::DISABLE_VERSIONING_LABEL;
use crate::model::new_entity_id;
use crate::model::note::{Note, NoteType};
use crate::model::revision::NoteRevision;
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use crate::repo::{LabelRepository, OptionRepository, RevisionRepository};
use crate::service::error::{NoteServiceError, ServiceResult};
use chrono::Duration;
use log::{debug, info};

/// Option holding the snapshot interval, in whole seconds.
pub const SNAPSHOT_INTERVAL_OPTION: &str = "note_revision_snapshot_time_interval";

/// Upper bound for the interval option (100 years).
const MAX_SNAPSHOT_INTERVAL_SECS: i64 = 100 * 365 * 24 * 60 * 60;

/// Typed view of the revision configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionSettings {
    pub snapshot_interval: Duration,
}

impl RevisionSettings {
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            snapshot_interval: Duration::seconds(seconds),
        }
    }

    /// Reads the current settings from the configuration store.
    ///
    /// # Errors
    /// - `MissingOption` when the interval option was never set.
    /// - `InvalidOption` when it is not an integer in `0..=100 years`.
    pub fn load<S: OptionRepository>(store: &S) -> ServiceResult<Self> {
        let raw = store
            .get_option(SNAPSHOT_INTERVAL_OPTION)?
            .ok_or(NoteServiceError::MissingOption(SNAPSHOT_INTERVAL_OPTION))?;
        match raw.trim().parse::<i64>() {
            Ok(seconds) if (0..=MAX_SNAPSHOT_INTERVAL_SECS).contains(&seconds) => {
                Ok(Self::from_seconds(seconds))
            }
            _ => Err(NoteServiceError::InvalidOption {
                name: SNAPSHOT_INTERVAL_OPTION,
                value: raw,
            }),
        }
    }
}

/// Snapshots `note` (its pre-update state) when the policy requires it.
///
/// Returns the stored revision, or `None` when a skip condition holds.
pub fn save_revision_if_needed<S, C>(
    store: &S,
    clock: &C,
    note: &Note,
    settings: &RevisionSettings,
) -> ServiceResult<Option<NoteRevision>>
where
    S: LabelRepository + RevisionRepository,
    C: Clock,
{
    if note.note_type == NoteType::File {
        debug!("event=revision_skip module=revision_policy reason=file_note");
        return Ok(None);
    }

    let labels = store.label_map(&note.note_id)?;
    if labels.get(DISABLE_VERSIONING_LABEL).map(String::as_str) == Some("true") {
        debug!("event=revision_skip module=revision_policy reason=versioning_disabled");
        return Ok(None);
    }

    let now = clock.now();
    let cutoff = format_timestamp(now - settings.snapshot_interval);
    if store.find_revision_since(&note.note_id, &cutoff)?.is_some() {
        debug!("event=revision_skip module=revision_policy reason=fresh_revision_exists");
        return Ok(None);
    }

    let created = parse_timestamp(&note.date_created).ok_or_else(|| {
        NoteServiceError::InvalidTimestamp {
            note_id: note.note_id.clone(),
            value: note.date_created.clone(),
        }
    })?;
    if now - created < settings.snapshot_interval {
        debug!("event=revision_skip module=revision_policy reason=note_too_young");
        return Ok(None);
    }

    let revision = NoteRevision {
        note_revision_id: new_entity_id(),
        note_id: note.note_id.clone(),
        title: note.title.clone(),
        content: note.content.clone(),
        is_protected: false,
        date_modified_from: note.date_modified.clone(),
        date_modified_to: format_timestamp(now),
    };
    store.insert_revision(&revision)?;
    info!(
        "event=revision_create module=revision_policy status=ok note_id={} revision_id={}",
        revision.note_id, revision.note_revision_id
    );
    Ok(Some(revision))
}
