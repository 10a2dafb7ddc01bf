//! Error types for networking module
//!
//! Everything here is a transport failure from the orchestrator's point of
//! view: no structured verdict arrived, so the optimistic move is rolled back.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    /// Connection, TLS, or body read failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("server returned {status}")]
    Status { status: reqwest::StatusCode },

    /// Response body is not a move reply
    #[error("malformed reply: {0}")]
    Decode(#[from] serde_json::Error),

    /// No reply within the configured timeout
    #[error("timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Server URL and endpoint do not form a valid URL
    #[error("invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for networking operations
pub type NetworkResult<T> = Result<T, NetworkError>;
