//! Terminal progress and event logging for a session.

use crate::session::SessionEvent;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::debug;

/// Log every session event at debug level until the session is dropped.
pub fn log_events(mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Event log skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            match event {
                SessionEvent::TextStaged { chars } => debug!("Staged {} characters", chars),
                SessionEvent::PresentationChanged { from, to } => {
                    debug!("Presentation {} -> {}", from, to)
                }
                SessionEvent::AnalysisStarted { run, total } => {
                    debug!("Run {} started with {} lines", run, total)
                }
                SessionEvent::LineAnalyzed {
                    run,
                    index,
                    total,
                    failed,
                } => debug!(
                    "Run {}: line {}/{} {}",
                    run,
                    index + 1,
                    total,
                    if failed { "failed" } else { "classified" }
                ),
                SessionEvent::ReportCommitted { run, lines, failed } => {
                    debug!("Run {} committed: {} lines, {} failed", run, lines, failed)
                }
                SessionEvent::ErrorRaised { message } => debug!("Error shown: {}", message),
                SessionEvent::SaveMessageChanged { message } => {
                    debug!("Save message: {}", message.as_deref().unwrap_or("(none)"))
                }
                SessionEvent::Cleared => debug!("Session cleared"),
            }
        }
    })
}

/// Drive a progress bar from session events until the run's report is committed.
///
/// The returned task ends on `ReportCommitted` or when the session goes away;
/// abort it if the run fails before dispatching.
pub fn track_analysis(mut events: broadcast::Receiver<SessionEvent>, hidden: bool) -> JoinHandle<()> {
    let bar = if hidden {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} lines {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::AnalysisStarted { total, .. }) => {
                    bar.set_length(total as u64);
                    bar.set_position(0);
                }
                Ok(SessionEvent::LineAnalyzed { failed, .. }) => {
                    bar.inc(1);
                    if failed {
                        bar.set_message("(some lines failed)");
                    }
                }
                Ok(SessionEvent::ReportCommitted { .. }) | Err(RecvError::Closed) => break,
                Ok(_) | Err(RecvError::Lagged(_)) => {}
            }
        }
        bar.finish_and_clear();
    })
}
