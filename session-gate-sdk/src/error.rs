//! Error types for the session gate.

use thiserror::Error;

/// Errors produced while resolving a session from the upstream identity
/// service.
///
/// Resolution failures are recorded inside the [`SessionRecord`] rather than
/// aborting the request pipeline, so the type is `Clone` and travels with the
/// request.
///
/// [`SessionRecord`]: crate::models::SessionRecord
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionResolveError {
    /// The session-service or user-lookup call failed (network, timeout,
    /// non-2xx, or an unparseable body).
    #[error("session service unavailable: {0}")]
    Upstream(String),

    /// An unexpected error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors produced by an authorization check.
///
/// The two variants map to distinct client-facing classifications: missing
/// scoping information is a client error (400), insufficient permissions an
/// authorization error (401). Callers must be able to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthorizeError {
    /// The session is JWT-typed but neither a project-id nor a role-id
    /// signal was supplied.
    #[error("missing header project-id or role-id for session type jwt")]
    MissingScoping,

    /// The effective permission set does not satisfy the declared
    /// requirement.
    #[error("permission denied")]
    PermissionDenied,
}
