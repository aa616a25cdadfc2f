//! Error types for the history API client.
//!
//! # Design
//! Transport failures (DNS, connection refused, broken body) are kept apart
//! from application failures (non-200 status, a 200 without the expected
//! field) so log lines say which side went wrong. Neither tier is classified
//! as retryable; that decision belongs to the caller.

use thiserror::Error;

/// Errors returned by `HistoryClient` parse methods and `Transport`
/// implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server answered with something other than 200.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 200 response whose JSON lacks the field the operation reports.
    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A commit must carry at least one operation.
    #[error("commit has no operations")]
    EmptyCommit,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<ureq::Error> for ApiError {
    fn from(e: ureq::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// Errors raised while loading `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("base URL `{0}` has no host")]
    InvalidBaseUrl(String),
}
