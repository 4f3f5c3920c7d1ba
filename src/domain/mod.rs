//! Domain models for mdm-cleanup
//!
//! This module contains pure domain objects: the enrollment identifier, removal
//! outcomes and the per-run summary. They hold no handles to the machine.

pub mod identifier;
pub mod outcome;
pub mod summary;

pub use identifier::EnrollmentId;
pub use outcome::{RemovalOutcome, RemovalReport};
pub use summary::{CleanupRecord, PendingRecord, RecordStatus, RunSummary};
