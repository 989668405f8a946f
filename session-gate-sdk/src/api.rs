//! Transport trait for the upstream identity service.
//!
//! The session resolver is written against this seam so tests (and
//! alternative deployments) can substitute the HTTP transport.

use async_trait::async_trait;

use crate::error::SessionResolveError;
use crate::models::{CredentialSignals, SessionData, SessionUser};

/// Client for the upstream identity service.
///
/// The default implementation (`HttpSessionServiceClient` in the
/// `session_gate` crate) issues plain GET requests with a bounded timeout;
/// no retries, no caching.
#[async_trait]
pub trait SessionServiceClient: Send + Sync {
    /// Fetch the session for the given credential signals.
    ///
    /// The authorization signal is forwarded verbatim; scoping signals are
    /// forwarded as headers only when present.
    ///
    /// # Errors
    ///
    /// `Upstream` for network failures, timeouts, non-2xx responses and
    /// unparseable bodies.
    async fn fetch_session(
        &self,
        signals: &CredentialSignals,
    ) -> Result<SessionData, SessionResolveError>;

    /// Look up a user by id (fallback path only).
    ///
    /// # Errors
    ///
    /// `Upstream` for network failures, timeouts, non-2xx responses and
    /// unparseable bodies.
    async fn fetch_user(&self, user_id: &str) -> Result<SessionUser, SessionResolveError>;
}
