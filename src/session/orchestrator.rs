//! The line-wise analysis session.
//!
//! A [`Session`] stages input text, classifies it one line at a time, and
//! keeps the resulting report together with save and error state.

use crate::analysis::segment::{has_content, segment};
use crate::client::{Classifier, ClientError, HistoryStore};
use crate::models::{HistoryEntry, Line, LineOutcome, Report, ReportMetadata};
use crate::session::state::{
    PendingError, PresentationState, SessionEvent, SessionState, StateStore, View,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Top-level failure of a session operation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Error: Please upload a file or enter text for analysis.")]
    EmptyInput,

    #[error("Error saving history. Please try again.")]
    Save(#[source] ClientError),

    #[error("Error fetching history: {0}")]
    History(#[source] ClientError),

    #[error("Failed to read {}: {source}", .path.display())]
    FileLoad {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Drives one user's analysis session against the remote collaborators.
pub struct Session<C, P> {
    classifier: C,
    store: P,
    state: StateStore,
}

impl<C: Classifier, P: HistoryStore> Session<C, P> {
    pub fn new(classifier: C, store: P) -> Self {
        Self {
            classifier,
            store,
            state: StateStore::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        self.state.state()
    }

    pub fn presentation(&self) -> PresentationState {
        crate::session::state::presentation(self.state.state())
    }

    pub fn view(&self) -> View {
        View::from_state(self.state.state())
    }

    /// The most recently committed report, if any.
    pub fn report(&self) -> Option<&Report> {
        self.state.state().report.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.state.subscribe()
    }

    /// Replace the staged text with a manual edit.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.stage(text.into());
    }

    /// Replace the staged text with loaded file content.
    pub fn load_from_file(&mut self, content: impl Into<String>) {
        self.stage(content.into());
    }

    /// Read a file from disk and stage its content.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. On read failure the
    /// session is left untouched.
    pub async fn load_file(&mut self, path: &Path) -> Result<(), SessionError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SessionError::FileLoad {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Loaded {} bytes from {}", bytes.len(), path.display());
        self.load_from_file(String::from_utf8_lossy(&bytes).into_owned());
        Ok(())
    }

    fn stage(&mut self, text: String) {
        self.state.update(|s| {
            s.staged_text = text;
            s.report = None;
            s.error = None;
        });
    }

    /// Classify every non-blank staged line, one request at a time.
    ///
    /// Per-line failures are recorded in the report and never returned.
    pub async fn analyze(&mut self) -> Result<Report, SessionError> {
        if !has_content(&self.state.state().staged_text) {
            warn!("Analyze requested with no content");
            self.state.update(|s| {
                s.error = Some(PendingError::Validation);
                s.report = None;
            });
            return Err(SessionError::EmptyInput);
        }

        let lines = segment(&self.state.state().staged_text);
        let total = lines.len();
        let run = self.state.state().last_run + 1;

        self.state.update(|s| {
            s.last_run = run;
            s.in_flight = Some(run);
            s.report = None;
            s.error = None;
            s.save_message = None;
        });
        self.state.notify(SessionEvent::AnalysisStarted { run, total });
        info!("Run {}: analyzing {} lines", run, total);

        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);

        for (index, line) in lines.into_iter().enumerate() {
            let outcome = self.classify_line(line).await;
            self.state.notify(SessionEvent::LineAnalyzed {
                run,
                index,
                total,
                failed: outcome.is_failed(),
            });
            outcomes.push(outcome);
        }

        let report = Report::new(
            ReportMetadata {
                run,
                analysis_date: Utc::now(),
                endpoint: self.classifier.endpoint(),
                duration_seconds: started.elapsed().as_secs_f64(),
            },
            outcomes,
        );

        info!(
            "Run {} complete: {} classified, {} failed in {:.1}s",
            run, report.summary.classified, report.summary.failed, report.metadata.duration_seconds
        );

        let committed = report.clone();
        self.state.update(|s| {
            s.in_flight = None;
            s.report = Some(committed);
        });

        Ok(report)
    }

    async fn classify_line(&self, line: Line) -> LineOutcome {
        debug!("Classifying line {}", line.number);

        match self.classifier.classify(&line.text).await {
            Ok(label) => LineOutcome::Classified { line, label },
            Err(e) => {
                warn!("Line {} failed: {}", line.number, e);
                LineOutcome::Failed {
                    line,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Ask the persistence service to record its history.
    pub async fn save(&mut self) -> Result<String, SessionError> {
        match self.store.save().await {
            Ok(message) => {
                info!("Save confirmed: {}", message);
                let stored = message.clone();
                self.state.update(|s| {
                    s.save_message = Some(stored);
                    if s.error == Some(PendingError::Save) {
                        s.error = None;
                    }
                });
                Ok(message)
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                self.state.update(|s| s.error = Some(PendingError::Save));
                Err(SessionError::Save(e))
            }
        }
    }

    /// Fetch the history recorded by the persistence service.
    pub async fn history(&self) -> Result<Vec<HistoryEntry>, SessionError> {
        self.store.history().await.map_err(SessionError::History)
    }

    /// Reset every field to its initial value.
    pub fn clear(&mut self) {
        let was_reset = self.state.state().is_reset();
        self.state.update(|s| {
            s.staged_text.clear();
            s.report = None;
            s.error = None;
            s.save_message = None;
            s.in_flight = None;
        });
        if !was_reset {
            self.state.notify(SessionEvent::Cleared);
        }
    }
}
