//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by the content loader.
///
/// Any variant aborts the load in progress; no partial quiz definition is
/// ever produced. Retrying is a caller decision.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    #[error("question provider access is not configured")]
    NotConfigured,

    #[error("question provider request failed with status {status}")]
    Provider {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("question provider response was not valid JSON (status {status})")]
    Parse {
        status: reqwest::StatusCode,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the session engine and circle-switch workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("answer value {value} is outside the 0..=100 scoring domain")]
    AnswerOutOfDomain { value: f64 },

    #[error("a newer circle request superseded this load")]
    Superseded,

    #[error(transparent)]
    Load(#[from] LoaderError),
}
