//! Domain errors for the session gate.

use session_gate_sdk::SessionResolveError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("session service unavailable: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<DomainError> for SessionResolveError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Upstream(msg) => Self::Upstream(msg),
            DomainError::InvalidConfig(msg) | DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<SessionResolveError> for DomainError {
    fn from(e: SessionResolveError) -> Self {
        match e {
            SessionResolveError::Upstream(msg) => Self::Upstream(msg),
            SessionResolveError::Internal(msg) => Self::Internal(msg),
        }
    }
}
