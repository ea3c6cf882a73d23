//! Report and view rendering.
//!
//! This module renders analysis reports as plain text, Markdown, or JSON,
//! and renders the session view for the interactive front-end.

use crate::analysis::{failed_lines, failure_rate, label_distribution};
use crate::cli::OutputFormat;
use crate::models::{HistoryEntry, LineOutcome, OutcomeSummary, Report, ReportMetadata};
use crate::session::View;
use anyhow::Result;

/// Plain-text report: one display string per line.
pub fn generate_text_report(report: &Report) -> String {
    let mut output = report.display_lines().join("\n");
    output.push('\n');
    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Sentiline Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summary));
    output.push_str(&generate_results_section(&report.outcomes));
    output.push_str(&generate_failures_section(&report.outcomes));
    output.push_str("---\n\n*Report generated by Sentiline*\n");

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Run:** {}\n", metadata.run));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Endpoint:** `{}`\n", metadata.endpoint));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_summary_section(summary: &OutcomeSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Lines | Classified | Failed | Failure Rate |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {:.0}% |\n\n",
        summary.total,
        summary.classified,
        summary.failed,
        failure_rate(summary)
    ));

    let labels = label_distribution(summary);
    if !labels.is_empty() {
        section.push_str("### Labels\n\n");
        section.push_str("| Label | Lines |\n");
        section.push_str("|:---|:---:|\n");
        for (label, count) in labels {
            section.push_str(&format!("| {} | {} |\n", label, count));
        }
        section.push('\n');
    }

    section
}

fn generate_results_section(outcomes: &[LineOutcome]) -> String {
    let mut section = String::new();

    section.push_str("## Results\n\n");
    for outcome in outcomes {
        section.push_str(&format!(
            "{}. {}\n",
            outcome.line().number,
            outcome.display()
        ));
    }
    section.push('\n');

    section
}

fn generate_failures_section(outcomes: &[LineOutcome]) -> String {
    let failed: Vec<_> = outcomes
        .iter()
        .filter_map(|o| match o {
            LineOutcome::Failed { line, reason } => Some((line, reason)),
            LineOutcome::Classified { .. } => None,
        })
        .collect();

    if failed.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Failed Lines\n\n");
    for (line, reason) in failed {
        section.push_str(&format!("- Line {}: {}\n", line.number, reason));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render a report in the requested format.
pub fn render_report(report: &Report, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_report(report)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
        OutputFormat::Json => {
            let mut json = generate_json_report(report)?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Render the session view for the terminal.
pub fn render_view(view: &View) -> String {
    let mut output = String::new();

    if let Some(ref error) = view.error {
        output.push_str(&format!("{}\n", error));
    }

    if !view.results.is_empty() {
        output.push_str("Analysis Results:\n");
        for result in &view.results {
            output.push_str(&format!("  {}\n", result));
        }
    }

    if let Some(ref message) = view.save_message {
        output.push_str(&format!("{}\n", message));
    }

    output
}

/// Render the service-side history as text.
pub fn generate_history_text(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No analysis history recorded.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&format!("Text: {}\nResult: {}\n\n", entry.text, entry.result));
    }
    output
}

/// One-line notice naming the lines that failed, if any.
pub fn generate_failure_notice(report: &Report) -> Option<String> {
    let failed = failed_lines(&report.outcomes);
    if failed.is_empty() {
        return None;
    }

    let numbers: Vec<String> = failed.iter().map(|l| l.number.to_string()).collect();
    Some(format!(
        "{} of {} lines could not be analyzed (lines {})",
        failed.len(),
        report.len(),
        numbers.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Line;
    use crate::session::state::PresentationState;
    use chrono::Utc;

    fn create_test_report() -> Report {
        Report::new(
            ReportMetadata {
                run: 3,
                analysis_date: Utc::now(),
                endpoint: "http://127.0.0.1:5000/api/analyze".to_string(),
                duration_seconds: 1.25,
            },
            vec![
                LineOutcome::Classified {
                    line: Line::new(1, "good"),
                    label: "positive".to_string(),
                },
                LineOutcome::Failed {
                    line: Line::new(3, "bad"),
                    reason: "service returned HTTP 500: boom".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_generate_text_report() {
        let text = generate_text_report(&create_test_report());
        assert_eq!(text, "\"good\": positive\n\"bad\": Error analyzing text.\n");
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Sentiline Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("- **Run:** 3"));
        assert!(markdown.contains("| 2 | 1 | 1 | 50% |"));
        assert!(markdown.contains("| positive | 1 |"));
        assert!(markdown.contains("1. \"good\": positive"));
        assert!(markdown.contains("3. \"bad\": Error analyzing text."));
        assert!(markdown.contains("- Line 3: service returned HTTP 500: boom"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"outcomes\""));
        assert!(json.contains("\"status\": \"failed\""));
    }

    #[test]
    fn test_render_report_formats() {
        let report = create_test_report();

        let text = render_report(&report, OutputFormat::Text).unwrap();
        assert_eq!(text, generate_text_report(&report));

        let markdown = render_report(&report, OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("# Sentiline Report"));

        let json = render_report(&report, OutputFormat::Json).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.outcomes, report.outcomes);
    }

    #[test]
    fn test_render_view() {
        let view = View {
            state: PresentationState::ResultsShown,
            results: vec!["\"good\": positive".to_string()],
            error: Some("Error saving history. Please try again.".to_string()),
            save_message: None,
        };

        let rendered = render_view(&view);
        assert!(rendered.starts_with("Error saving history. Please try again.\n"));
        assert!(rendered.contains("Analysis Results:\n  \"good\": positive\n"));
    }

    #[test]
    fn test_render_idle_view_is_empty() {
        let view = View {
            state: PresentationState::Idle,
            results: vec![],
            error: None,
            save_message: None,
        };
        assert!(render_view(&view).is_empty());
    }

    #[test]
    fn test_generate_history_text() {
        assert_eq!(generate_history_text(&[]), "No analysis history recorded.\n");

        let text = generate_history_text(&[HistoryEntry {
            text: "good".to_string(),
            result: "Positive".to_string(),
        }]);
        assert_eq!(text, "Text: good\nResult: Positive\n\n");
    }

    #[test]
    fn test_generate_failure_notice() {
        let notice = generate_failure_notice(&create_test_report()).unwrap();
        assert_eq!(notice, "1 of 2 lines could not be analyzed (lines 3)");
    }
}
