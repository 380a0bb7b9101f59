//! Sibling position allocation for new placements.
//!
//! # Invariants
//! - `Into` yields `max(active sibling position) + 1`, or `0` without siblings.
//! - `After(b)` yields `position(b) + 1` and shifts every active sibling
//!   above `position(b)` by one, in the same transaction as one
//!   `note_reordering` notification for the parent.
//! - Shifted rows keep their `date_modified` and get no per-row sync entry.

use crate::model::branch::BranchId;
use crate::repo::{BranchRepository, SyncRepository, Transactional};
use crate::service::error::{NoteServiceError, ServiceResult};
use log::debug;

/// Where a new placement goes among its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Last child of the parent.
    Into,
    /// Immediately after an existing sibling branch.
    After(BranchId),
}

impl Placement {
    /// Parses wire-style placement input (`"into"` / `"after"`).
    ///
    /// # Errors
    /// - `UnknownPlacementTarget` for any other target value.
    /// - `MissingTargetBranchId` for `after` without a non-empty branch id.
    pub fn from_target(target: &str, target_branch_id: Option<&str>) -> ServiceResult<Self> {
        match target {
            "into" => Ok(Self::Into),
            "after" => match target_branch_id.map(str::trim) {
                Some(branch_id) if !branch_id.is_empty() => Ok(Self::After(branch_id.to_string())),
                _ => Err(NoteServiceError::MissingTargetBranchId),
            },
            other => Err(NoteServiceError::UnknownPlacementTarget(other.to_string())),
        }
    }
}

/// Computes the position for a new placement under `parent_note_id`.
///
/// # Side effects
/// - `After`: shifts later active siblings and records one reorder
///   notification for the parent.
///
/// # Errors
/// - `TargetBranchNotFound` when the reference branch is missing or deleted.
/// - `TargetBranchParentMismatch` when it belongs to another parent.
pub fn allocate_note_position<S>(
    store: &S,
    parent_note_id: &str,
    placement: &Placement,
) -> ServiceResult<i64>
where
    S: BranchRepository + SyncRepository + Transactional,
{
    match placement {
        Placement::Into => {
            let next = store
                .max_note_position(parent_note_id)?
                .map_or(0, |max| max + 1);
            debug!("event=position_allocate module=placement target=into position={next}");
            Ok(next)
        }
        Placement::After(branch_id) => store.transaction(|| -> ServiceResult<i64> {
            let reference = store
                .get_branch(branch_id)?
                .filter(|branch| !branch.is_deleted)
                .ok_or_else(|| NoteServiceError::TargetBranchNotFound(branch_id.clone()))?;
            if reference.parent_note_id != parent_note_id {
                return Err(NoteServiceError::TargetBranchParentMismatch {
                    branch_id: branch_id.clone(),
                    parent_note_id: parent_note_id.to_string(),
                });
            }

            let shifted =
                store.shift_note_positions_after(parent_note_id, reference.note_position)?;
            store.add_note_reordering_sync(parent_note_id)?;
            let next = reference.note_position + 1;
            debug!(
                "event=position_allocate module=placement target=after position={next} shifted={shifted}"
            );
            Ok(next)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::Placement;
    use crate::service::error::NoteServiceError;

    #[test]
    fn parses_known_targets() {
        assert_eq!(Placement::from_target("into", None).unwrap(), Placement::Into);
        assert_eq!(
            Placement::from_target("after", Some("b1")).unwrap(),
            Placement::After("b1".to_string())
        );
    }

    #[test]
    fn rejects_unknown_target() {
        let err = Placement::from_target("before", Some("b1")).unwrap_err();
        assert!(matches!(err, NoteServiceError::UnknownPlacementTarget(value) if value == "before"));
    }

    #[test]
    fn after_requires_branch_id() {
        assert!(matches!(
            Placement::from_target("after", None),
            Err(NoteServiceError::MissingTargetBranchId)
        ));
        assert!(matches!(
            Placement::from_target("after", Some("  ")),
            Err(NoteServiceError::MissingTargetBranchId)
        ));
    }
}
