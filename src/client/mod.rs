//! Remote collaborators used by the session.
//!
//! The classification service labels one line at a time; the persistence
//! service records the analysis history kept on its side. Both sit behind
//! traits so the session can be driven by fakes in tests.

pub mod service;

pub use service::{ClientConfig, ServiceClient};

use crate::models::HistoryEntry;
use async_trait::async_trait;
use thiserror::Error;

/// Failure talking to a remote collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot connect to analysis service at {0}")]
    Connect(String),

    #[error("service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Transport(String),
}

/// Labels a single line of text.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<String, ClientError>;

    /// Human-readable location of the classifier, recorded in report metadata.
    fn endpoint(&self) -> String;
}

/// Persists the analysis history held by the remote service.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Ask the service to persist its history; returns its confirmation message.
    async fn save(&self) -> Result<String, ClientError>;

    /// Fetch the history the service has recorded so far.
    async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError>;
}
