// Error handling module
// Defines the error types surfaced by the client and its transport

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Category of a transport failure, used for logging and for callers that
/// want to decide on their own retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Other,
}

impl TransportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connection_failed",
            TransportErrorKind::Request => "request_error",
            TransportErrorKind::Body => "body_error",
            TransportErrorKind::Decode => "decode_error",
            TransportErrorKind::Other => "unknown",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network-level failure: the request never produced an HTTP response
#[derive(Error, Debug, Clone)]
#[error("HTTP request failed: {message} (kind: {kind})")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == TransportErrorKind::Timeout
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            TransportErrorKind::Timeout
        } else if e.is_connect() {
            TransportErrorKind::Connect
        } else if e.is_request() || e.is_builder() {
            TransportErrorKind::Request
        } else if e.is_body() {
            TransportErrorKind::Body
        } else if e.is_decode() {
            TransportErrorKind::Decode
        } else {
            TransportErrorKind::Other
        };

        Self::new(kind, e.to_string())
    }
}

/// Errors returned to callers of the authenticated client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network failure, passed through untouched
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Non-success status where the caller asked for a decoded body
    #[error("Backend error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Why a token refresh did not succeed. Logged by the refresh coordinator,
/// never returned to request callers.
#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("Token refresh rejected: {status} - {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Token refresh error: {0}")]
    Transport(#[from] TransportError),

    #[error("Token refresh timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
