//! Per-file outcomes and the batch summary.

use serde::{Deserialize, Serialize};

/// Terminal state of one upload candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Uploaded next to its match but left unlinked (link warning).
    Uploaded,
    /// Uploaded and linked (or appended) as a new version.
    Versioned,
    /// No usable match; uploaded into the fallback folder.
    UploadedFallback,
    /// Both the primary and any fallback upload failed.
    Failed,
}

/// Recorded outcome for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileOutcome {
    pub file_name: String,
    pub status: FileStatus,
    /// Present when something non-fatal went wrong along the way.
    pub detail: Option<String>,
}

impl FileOutcome {
    /// Warning-class outcomes degrade the batch summary.
    pub fn is_warning(&self) -> bool {
        self.status == FileStatus::Failed || self.detail.is_some()
    }
}

/// Aggregate signal for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchSummary {
    Complete,
    CompleteWithWarnings,
    /// The loop ended before every candidate reached a terminal state.
    /// Defensive: the orchestrator's per-candidate boundary should make
    /// this unreachable.
    Interrupted,
}

/// Collects per-file outcomes and produces the end-of-run summary.
#[derive(Debug)]
pub struct BatchReport {
    expected: usize,
    outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// A report expecting one outcome per candidate.
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            outcomes: Vec::with_capacity(expected),
        }
    }

    pub fn record(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[FileOutcome] {
        &self.outcomes
    }

    pub fn summary(&self) -> BatchSummary {
        if self.outcomes.len() != self.expected {
            return BatchSummary::Interrupted;
        }
        if self.outcomes.iter().any(FileOutcome::is_warning) {
            return BatchSummary::CompleteWithWarnings;
        }
        BatchSummary::Complete
    }

    /// One-line aggregate for the end-of-run message.
    pub fn message(&self) -> String {
        match self.summary() {
            BatchSummary::Interrupted => "upload interrupted".to_string(),
            _ => {
                let uploaded = self
                    .outcomes
                    .iter()
                    .filter(|o| o.status != FileStatus::Failed)
                    .count();
                let warnings = self.outcomes.iter().filter(|o| o.is_warning()).count();
                if warnings == 0 {
                    format!("{uploaded} uploaded")
                } else {
                    format!("{uploaded} uploaded, {warnings} with warnings")
                }
            }
        }
    }
}
