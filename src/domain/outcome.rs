//! Removal outcomes
//!
//! Every remover returns one [`RemovalOutcome`] per concrete item it acted on
//! (a task, a registry key, a certificate), plus the names of expected items it
//! found absent. Absence is a warning, never a failure.

use serde::Serialize;

/// Result of deleting one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failed { detail: String },
}

/// One item acted upon by a remover
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalOutcome {
    /// Task path, registry key path or certificate subject
    pub item: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl RemovalOutcome {
    pub fn success(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: OutcomeStatus::Success,
        }
    }

    pub fn failed(item: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status: OutcomeStatus::Failed {
                detail: detail.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Everything one remover call did
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalReport {
    pub outcomes: Vec<RemovalOutcome>,
    /// Expected items that were not there
    pub absent: Vec<String>,
}

impl RemovalReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: RemovalOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn record_absent(&mut self, item: impl Into<String>) {
        self.absent.push(item.into());
    }

    #[cfg(test)]
    pub fn succeeded(&self) -> impl Iterator<Item = &RemovalOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RemovalOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    #[cfg(test)]
    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }

    /// Nothing was acted on
    pub fn is_noop(&self) -> bool {
        self.outcomes.is_empty()
    }
}
