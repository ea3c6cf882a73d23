//! Data models for line-wise analysis.
//!
//! This module contains the core data structures used throughout
//! the application for representing lines, per-line outcomes, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker shown in place of a label when a line could not be classified.
pub const FAILURE_MARKER: &str = "Error analyzing text.";

/// A single non-blank line of staged input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Position of the line in the staged text (1-indexed, blank lines counted).
    pub number: usize,
    /// The line text, sent verbatim to the classifier.
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LineOutcome {
    /// The classifier returned a label for the line.
    Classified { line: Line, label: String },
    /// The classifier call failed; the reason is kept for logs and JSON output.
    Failed { line: Line, reason: String },
}

impl LineOutcome {
    /// The line this outcome belongs to.
    pub fn line(&self) -> &Line {
        match self {
            LineOutcome::Classified { line, .. } | LineOutcome::Failed { line, .. } => line,
        }
    }

    /// The label, if the line was classified.
    pub fn label(&self) -> Option<&str> {
        match self {
            LineOutcome::Classified { label, .. } => Some(label),
            LineOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LineOutcome::Failed { .. })
    }

    /// Display string combining the line with its label or the failure marker.
    pub fn display(&self) -> String {
        match self {
            LineOutcome::Classified { line, label } => format!("\"{}\": {}", line.text, label),
            LineOutcome::Failed { line, .. } => format!("\"{}\": {}", line.text, FAILURE_MARKER),
        }
    }
}

/// Summary of outcomes in a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    /// Total number of lines analyzed.
    pub total: usize,
    /// Number of lines that received a label.
    pub classified: usize,
    /// Number of lines that failed.
    pub failed: usize,
    /// Classified lines grouped by normalized label.
    pub by_label: HashMap<String, usize>,
}

impl OutcomeSummary {
    /// Creates a summary from a list of outcomes.
    pub fn from_outcomes(outcomes: &[LineOutcome]) -> Self {
        let mut summary = Self {
            total: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome.label() {
                Some(label) => {
                    summary.classified += 1;
                    *summary
                        .by_label
                        .entry(label.trim().to_lowercase())
                        .or_insert(0) += 1;
                }
                None => summary.failed += 1,
            }
        }

        summary
    }
}

/// Metadata about one analyze run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Session-local run identifier, increasing with every analyze call.
    pub run: u64,
    /// Date and time the run completed.
    pub analysis_date: DateTime<Utc>,
    /// Where the lines were classified.
    pub endpoint: String,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The ordered outcomes of the most recent analyze run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// One outcome per line, in input order.
    pub outcomes: Vec<LineOutcome>,
    pub summary: OutcomeSummary,
}

impl Report {
    /// Builds a report and its summary from ordered outcomes.
    pub fn new(metadata: ReportMetadata, outcomes: Vec<LineOutcome>) -> Self {
        let summary = OutcomeSummary::from_outcomes(&outcomes);
        Self {
            metadata,
            outcomes,
            summary,
        }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Display strings for every outcome, in order.
    pub fn display_lines(&self) -> Vec<String> {
        self.outcomes.iter().map(LineOutcome::display).collect()
    }
}

/// One entry of the analysis history kept by the persistence service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub result: String,
}
