//! In-memory collaborators for session tests.

use crate::client::{Classifier, ClientError, HistoryStore};
use crate::models::HistoryEntry;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Labels every line "positive" unless it is listed as failing.
#[derive(Default)]
pub struct FakeClassifier {
    pub failing: HashSet<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeClassifier {
    pub fn failing(lines: &[&str]) -> Self {
        Self {
            failing: lines.iter().map(|l| l.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl Classifier for FakeClassifier {
    async fn classify(&self, text: &str) -> Result<String, ClientError> {
        self.calls.lock().unwrap().push(text.to_string());
        if self.failing.contains(text) {
            Err(ClientError::Status {
                status: 500,
                message: "boom".to_string(),
            })
        } else {
            Ok("positive".to_string())
        }
    }

    fn endpoint(&self) -> String {
        "fake://classifier".to_string()
    }
}

/// Answers saves with a fixed message after an optional run of failures.
pub struct FakeStore {
    message: String,
    failures: usize,
    pub saves: Arc<AtomicUsize>,
}

impl FakeStore {
    pub fn ok(message: &str) -> Self {
        Self::failing_first(0, message)
    }

    pub fn failing() -> Self {
        Self::failing_first(usize::MAX, "")
    }

    /// Fails the first `failures` saves, then succeeds with `message`.
    pub fn failing_first(failures: usize, message: &str) -> Self {
        Self {
            message: message.to_string(),
            failures,
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl HistoryStore for FakeStore {
    async fn save(&self) -> Result<String, ClientError> {
        let attempt = self.saves.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            Err(ClientError::Status {
                status: 503,
                message: "unavailable".to_string(),
            })
        } else {
            Ok(self.message.clone())
        }
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        Ok(vec![HistoryEntry {
            text: "good".to_string(),
            result: "positive".to_string(),
        }])
    }
}
