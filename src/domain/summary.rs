//! Cleanup records and the run summary
//!
//! A [`PendingRecord`] is opened when processing of an identifier starts and is
//! turned into exactly one [`CleanupRecord`] when it ends, on the success path
//! or the failure path. The [`RunSummary`] counts are folded from the records
//! and run-level notes rather than kept as running tallies.

use serde::Serialize;

use super::EnrollmentId;

/// Terminal status of one identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Success,
    Failed,
}

/// Record being built while an identifier is processed
#[derive(Debug)]
pub struct PendingRecord {
    identifier: EnrollmentId,
    warnings: Vec<String>,
    item_failures: usize,
}

impl PendingRecord {
    pub fn start(identifier: EnrollmentId) -> Self {
        Self {
            identifier,
            warnings: Vec::new(),
            item_failures: 0,
        }
    }

    pub fn identifier(&self) -> &EnrollmentId {
        &self.identifier
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn add_item_failures(&mut self, count: usize) {
        self.item_failures += count;
    }

    pub fn succeed(self) -> CleanupRecord {
        self.finish(RecordStatus::Success, None)
    }

    pub fn fail(self, reason: impl Into<String>) -> CleanupRecord {
        self.finish(RecordStatus::Failed, Some(reason.into()))
    }

    fn finish(self, status: RecordStatus, failure: Option<String>) -> CleanupRecord {
        CleanupRecord {
            identifier: self.identifier,
            status,
            warnings: self.warnings,
            item_failures: self.item_failures,
            failure,
        }
    }
}

/// Final record for one identifier processed in a run
#[derive(Debug, Clone, Serialize)]
pub struct CleanupRecord {
    pub identifier: EnrollmentId,
    pub status: RecordStatus,
    pub warnings: Vec<String>,
    /// Individual tasks or keys that could not be deleted
    pub item_failures: usize,
    /// Why the identifier's sequence was aborted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

/// Severity of a run-level note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteLevel {
    Warning,
    Error,
}

/// Something that happened outside any single identifier
#[derive(Debug, Clone, Serialize)]
pub struct RunNote {
    pub level: NoteLevel,
    pub message: String,
}

/// Aggregate counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub succeeded: usize,
    pub warned: usize,
    pub failed: usize,
}

/// Outcome of one orchestrator run. Never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub records: Vec<CleanupRecord>,
    pub notes: Vec<RunNote>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CleanupRecord) {
        self.records.push(record);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.notes.push(RunNote {
            level: NoteLevel::Warning,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.notes.push(RunNote {
            level: NoteLevel::Error,
            message: message.into(),
        });
    }

    /// Succeeded and failed identifiers, and every warning raised in the run.
    pub fn counts(&self) -> SummaryCounts {
        let counts = self
            .records
            .iter()
            .fold(SummaryCounts::default(), |mut acc, record| {
                match record.status {
                    RecordStatus::Success => acc.succeeded += 1,
                    RecordStatus::Failed => acc.failed += 1,
                }
                acc.warned += record.warnings.len();
                acc
            });
        let run_warnings = self
            .notes
            .iter()
            .filter(|n| n.level == NoteLevel::Warning)
            .count();
        SummaryCounts {
            warned: counts.warned + run_warnings,
            ..counts
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &RunNote> {
        self.notes.iter().filter(|n| n.level == NoteLevel::Error)
    }

    /// No failed identifiers and no run-level errors
    pub fn is_clean(&self) -> bool {
        self.counts().failed == 0 && self.errors().next().is_none()
    }

    #[cfg(test)]
    pub fn record_for(&self, identifier: &EnrollmentId) -> Option<&CleanupRecord> {
        self.records.iter().find(|r| &r.identifier == identifier)
    }

    /// JSON rendering with the folded counts included
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "counts": self.counts(),
            "records": self.records,
            "notes": self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> EnrollmentId {
        EnrollmentId::parse(&format!("{n:08X}-0000-0000-0000-000000000000")).unwrap()
    }

    #[test]
    fn test_counts_fold_records_and_notes() {
        let mut summary = RunSummary::new();

        let mut first = PendingRecord::start(id(1));
        first.warn("no DeviceEnroller key");
        summary.push(first.succeed());
        summary.push(PendingRecord::start(id(2)).succeed());
        summary.push(PendingRecord::start(id(3)).fail("registry unreachable"));
        summary.warn("no matching certificates");

        assert_eq!(
            summary.counts(),
            SummaryCounts {
                succeeded: 2,
                warned: 2,
                failed: 1,
            }
        );
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_empty_summary_is_clean() {
        let summary = RunSummary::new();
        assert_eq!(summary.counts(), SummaryCounts::default());
        assert!(summary.is_clean());
    }

    #[test]
    fn test_run_error_makes_summary_unclean() {
        let mut summary = RunSummary::new();
        summary.error("scheduler unreachable");
        assert_eq!(summary.counts().failed, 0);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_failed_record_keeps_reason() {
        let record = PendingRecord::start(id(4)).fail("boom");
        assert_eq!(record.status, RecordStatus::Failed);
        assert_eq!(record.failure.as_deref(), Some("boom"));
    }

    #[test]
    fn test_json_contains_counts() {
        let mut summary = RunSummary::new();
        summary.push(PendingRecord::start(id(5)).succeed());
        let json = summary.to_json();
        assert_eq!(json["counts"]["succeeded"], 1);
        assert_eq!(json["records"][0]["status"], "success");
    }
}
