//! Outcome aggregation and statistics.
//!
//! This module provides projections over the ordered outcomes of an analyze
//! run: failed lines and label statistics.

use crate::models::{Line, LineOutcome, OutcomeSummary};

/// Lines whose classification failed, in input order.
pub fn failed_lines(outcomes: &[LineOutcome]) -> Vec<&Line> {
    outcomes
        .iter()
        .filter(|o| o.is_failed())
        .map(LineOutcome::line)
        .collect()
}

/// Label counts sorted by frequency (ties broken alphabetically).
pub fn label_distribution(summary: &OutcomeSummary) -> Vec<(&str, usize)> {
    let mut labels: Vec<(&str, usize)> = summary
        .by_label
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();

    labels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    labels
}

/// Percentage of lines that failed, 0.0 for an empty run.
pub fn failure_rate(summary: &OutcomeSummary) -> f64 {
    if summary.total == 0 {
        return 0.0;
    }
    (summary.failed as f64 / summary.total as f64) * 100.0
}

/// Generate a text summary of outcome statistics.
pub fn generate_summary_text(summary: &OutcomeSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Lines analyzed: {}", summary.total));
    lines.push(format!("- Classified: {}", summary.classified));
    lines.push(format!("- Failed: {}", summary.failed));

    let labels = label_distribution(summary);
    if !labels.is_empty() {
        lines.push(String::new());
        lines.push("By Label:".to_string());
        for (label, count) in labels {
            lines.push(format!("- {}: {}", label, count));
        }
    }

    lines.join("\n")
}
