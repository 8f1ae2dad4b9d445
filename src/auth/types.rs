// Authentication types

use serde::Deserialize;
use serde_json::Value;

/// Result of probing the backend for the current session
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    /// Session cookie accepted. `user` is the token payload echoed by the backend.
    Authenticated { user: Option<Value> },
    Unauthenticated,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthStatus::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&Value> {
        match self {
            AuthStatus::Authenticated { user } => user.as_ref(),
            AuthStatus::Unauthenticated => None,
        }
    }
}

/// Error body returned by the backend (`{"detail": "..."}`)
#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
    pub detail: Option<String>,
}

impl ErrorDetail {
    /// Extract `detail` from a response body, falling back to `default`
    pub fn from_body(body: &[u8], default: &str) -> String {
        serde_json::from_slice::<ErrorDetail>(body)
            .ok()
            .and_then(|e| e.detail)
            .unwrap_or_else(|| default.to_string())
    }
}

/// Body of the session check endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ProtectedResponse {
    pub user: Option<Value>,
}
