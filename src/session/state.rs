//! Session state and change notification.
//!
//! [`SessionState`] holds the canonical fields of a session. What the user
//! sees is always derived from them by [`presentation`] and [`View`], never
//! stored separately. Every mutation goes through [`StateStore::update`],
//! which diffs old and new state and broadcasts [`SessionEvent`]s.

use crate::models::Report;
use std::fmt;
use tokio::sync::broadcast;

pub const VALIDATION_MESSAGE: &str = "Error: Please upload a file or enter text for analysis.";
pub const SAVE_ERROR_MESSAGE: &str = "Error saving history. Please try again.";

/// A user-visible error waiting to be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingError {
    /// Analyze was requested with blank input.
    Validation,
    /// The persistence service could not be reached or refused.
    Save,
}

impl PendingError {
    pub fn message(&self) -> &'static str {
        match self {
            PendingError::Validation => VALIDATION_MESSAGE,
            PendingError::Save => SAVE_ERROR_MESSAGE,
        }
    }
}

/// What the front-end should be showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationState {
    Idle,
    Analyzing,
    ResultsShown,
    ErrorShown,
}

impl fmt::Display for PresentationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationState::Idle => write!(f, "idle"),
            PresentationState::Analyzing => write!(f, "analyzing"),
            PresentationState::ResultsShown => write!(f, "results"),
            PresentationState::ErrorShown => write!(f, "error"),
        }
    }
}

/// Canonical session fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    /// The editable input buffer.
    pub staged_text: String,
    /// Outcomes of the most recently completed analyze run.
    pub report: Option<Report>,
    pub error: Option<PendingError>,
    /// Confirmation from the last successful save.
    pub save_message: Option<String>,
    /// Run id of the analyze call currently in flight.
    pub in_flight: Option<u64>,
    /// Id of the most recently started run.
    pub last_run: u64,
}

impl SessionState {
    /// Whether every user-visible field is back at its initial value.
    pub fn is_reset(&self) -> bool {
        self.staged_text.is_empty()
            && self.report.is_none()
            && self.error.is_none()
            && self.save_message.is_none()
            && self.in_flight.is_none()
    }
}

/// Derive the presentation state from the canonical fields.
///
/// Results and a validation error never show together; a save error leaves
/// existing results on screen.
pub fn presentation(state: &SessionState) -> PresentationState {
    if state.in_flight.is_some() {
        return PresentationState::Analyzing;
    }

    match (&state.report, state.error) {
        (_, Some(PendingError::Validation)) => PresentationState::ErrorShown,
        (Some(_), _) => PresentationState::ResultsShown,
        (None, Some(_)) => PresentationState::ErrorShown,
        (None, None) => PresentationState::Idle,
    }
}

/// Rendered projection of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub state: PresentationState,
    /// Display strings of the current report, empty unless results are shown.
    pub results: Vec<String>,
    pub error: Option<String>,
    pub save_message: Option<String>,
}

impl View {
    pub fn from_state(state: &SessionState) -> Self {
        let presentation = presentation(state);

        let results = match (&state.report, presentation) {
            (Some(report), PresentationState::ResultsShown) => report.display_lines(),
            _ => Vec::new(),
        };

        Self {
            state: presentation,
            results,
            error: state.error.map(|e| e.message().to_string()),
            save_message: state.save_message.clone(),
        }
    }
}

/// Change events emitted when session state is modified.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The input buffer was replaced.
    TextStaged { chars: usize },

    PresentationChanged {
        from: PresentationState,
        to: PresentationState,
    },

    /// An analyze run began dispatching lines.
    AnalysisStarted { run: u64, total: usize },

    /// One line of a run has settled.
    LineAnalyzed {
        run: u64,
        index: usize,
        total: usize,
        failed: bool,
    },

    /// A run's report became the current report.
    ReportCommitted { run: u64, lines: usize, failed: usize },

    ErrorRaised { message: String },

    SaveMessageChanged { message: Option<String> },

    /// Every field returned to its initial value.
    Cleared,
}

/// Owns the session state and broadcasts every change.
pub struct StateStore {
    state: SessionState,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            state: SessionState::default(),
            events,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Apply a mutation and emit the events describing it.
    pub fn update<F>(&mut self, update_fn: F) -> Vec<SessionEvent>
    where
        F: FnOnce(&mut SessionState),
    {
        let old = self.state.clone();
        update_fn(&mut self.state);

        let changes = detect_changes(&old, &self.state);
        for change in &changes {
            self.notify(change.clone());
        }
        changes
    }

    /// Emit an event that is not a state diff (progress, clear).
    pub fn notify(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn detect_changes(old: &SessionState, new: &SessionState) -> Vec<SessionEvent> {
    let mut changes = Vec::new();

    if old == new {
        return changes;
    }

    if old.staged_text != new.staged_text {
        changes.push(SessionEvent::TextStaged {
            chars: new.staged_text.chars().count(),
        });
    }

    if let Some(report) = &new.report {
        let was = old.report.as_ref().map(|r| r.metadata.run);
        if was != Some(report.metadata.run) {
            changes.push(SessionEvent::ReportCommitted {
                run: report.metadata.run,
                lines: report.len(),
                failed: report.summary.failed,
            });
        }
    }

    if let Some(error) = new.error {
        if old.error != Some(error) {
            changes.push(SessionEvent::ErrorRaised {
                message: error.message().to_string(),
            });
        }
    }

    if old.save_message != new.save_message {
        changes.push(SessionEvent::SaveMessageChanged {
            message: new.save_message.clone(),
        });
    }

    let (from, to) = (presentation(old), presentation(new));
    if from != to {
        changes.push(SessionEvent::PresentationChanged { from, to });
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Line, LineOutcome, ReportMetadata};
    use chrono::Utc;

    fn report(run: u64) -> Report {
        Report::new(
            ReportMetadata {
                run,
                analysis_date: Utc::now(),
                endpoint: "fake".to_string(),
                duration_seconds: 0.0,
            },
            vec![LineOutcome::Classified {
                line: Line::new(1, "good"),
                label: "positive".to_string(),
            }],
        )
    }

    #[test]
    fn test_presentation_idle() {
        assert_eq!(
            presentation(&SessionState::default()),
            PresentationState::Idle
        );
    }

    #[test]
    fn test_presentation_analyzing_hides_everything() {
        let state = SessionState {
            report: Some(report(1)),
            in_flight: Some(2),
            ..SessionState::default()
        };
        assert_eq!(presentation(&state), PresentationState::Analyzing);
        assert!(View::from_state(&state).results.is_empty());
    }

    #[test]
    fn test_validation_error_suppresses_results() {
        let state = SessionState {
            report: Some(report(1)),
            error: Some(PendingError::Validation),
            ..SessionState::default()
        };
        let view = View::from_state(&state);
        assert_eq!(view.state, PresentationState::ErrorShown);
        assert!(view.results.is_empty());
        assert_eq!(view.error.as_deref(), Some(VALIDATION_MESSAGE));
    }

    #[test]
    fn test_save_error_keeps_results() {
        let state = SessionState {
            report: Some(report(1)),
            error: Some(PendingError::Save),
            ..SessionState::default()
        };
        let view = View::from_state(&state);
        assert_eq!(view.state, PresentationState::ResultsShown);
        assert_eq!(view.results, vec!["\"good\": positive"]);
        assert_eq!(view.error.as_deref(), Some(SAVE_ERROR_MESSAGE));
    }

    #[test]
    fn test_save_error_without_results() {
        let state = SessionState {
            error: Some(PendingError::Save),
            ..SessionState::default()
        };
        assert_eq!(presentation(&state), PresentationState::ErrorShown);
    }

    #[test]
    fn test_update_emits_events() {
        let mut store = StateStore::new();
        let mut rx = store.subscribe();

        let changes = store.update(|s| s.staged_text = "hello".to_string());
        assert_eq!(changes, vec![SessionEvent::TextStaged { chars: 5 }]);
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::TextStaged { chars: 5 });

        let changes = store.update(|s| s.report = Some(report(1)));
        assert!(changes.contains(&SessionEvent::ReportCommitted {
            run: 1,
            lines: 1,
            failed: 0
        }));
        assert!(changes.contains(&SessionEvent::PresentationChanged {
            from: PresentationState::Idle,
            to: PresentationState::ResultsShown,
        }));
    }

    #[test]
    fn test_noop_update_is_silent() {
        let mut store = StateStore::new();
        assert!(store.update(|_| {}).is_empty());
    }

    #[test]
    fn test_emptying_fields_is_not_a_clear() {
        let mut store = StateStore::new();
        store.update(|s| {
            s.staged_text = "x".to_string();
            s.error = Some(PendingError::Validation);
        });

        let changes = store.update(|s| {
            s.staged_text.clear();
            s.error = None;
        });
        assert!(store.state().is_reset());
        assert!(!changes.contains(&SessionEvent::Cleared));
        assert_eq!(changes.first(), Some(&SessionEvent::TextStaged { chars: 0 }));
    }
}
