//! Note lifecycle services.
//!
//! # Responsibility
//! - Orchestrate repository calls into note lifecycle use-cases.
//! - Keep placement, revision, image, protection and deletion rules above
//!   the storage boundary.
//!
//! # Invariants
//! - Multi-entity writes run inside one storage transaction.
//! - Validation errors are raised before the first write.

pub mod deletion;
pub mod error;
pub mod image_tracker;
pub mod note_service;
pub mod placement;
pub mod protection;
pub mod revision_policy;
