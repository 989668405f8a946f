//! Session resolution service.
//!
//! Resolves a session from request credentials: one primary call to the
//! session service, and on primary failure a sequential fallback that
//! decodes the bearer token for a `userId` claim and looks the user up
//! directly. Failures are recorded in the returned [`SessionRecord`] rather
//! than propagated, so the request pipeline always continues and downstream
//! permission checks observe an empty-permission session.

use std::sync::Arc;

use session_gate_sdk::{
    CredentialSignals, SessionData, SessionRecord, SessionServiceClient,
};

use super::claims;

/// Session resolver service.
pub struct Service {
    client: Arc<dyn SessionServiceClient>,
}

impl Service {
    #[must_use]
    pub fn new(client: Arc<dyn SessionServiceClient>) -> Self {
        Self { client }
    }

    /// Resolve a session record for the given credential signals.
    ///
    /// Issues exactly one or two outbound calls: the primary session fetch,
    /// and at most one user lookup when the primary fails and the token
    /// carries a `userId` claim.
    #[tracing::instrument(skip_all)]
    pub async fn resolve(&self, signals: &CredentialSignals) -> SessionRecord {
        let primary_error = match self.client.fetch_session(signals).await {
            Ok(data) => return SessionRecord::resolved(data),
            Err(e) => e,
        };
        tracing::debug!(error = %primary_error, "session fetch failed, trying claim fallback");

        match self.try_claim_fallback(signals).await {
            Some(data) => SessionRecord::resolved(data),
            None => SessionRecord::failed(primary_error),
        }
    }

    /// Fallback: decode the token's `userId` claim and look the user up.
    ///
    /// Returns `None` when there is no token, no claim, or the lookup
    /// fails — the caller keeps the original failure in that case.
    async fn try_claim_fallback(&self, signals: &CredentialSignals) -> Option<SessionData> {
        let token = signals.authorization.as_deref()?;
        let user_id = claims::user_id_claim(token)?;

        match self.client.fetch_user(&user_id).await {
            Ok(user) => Some(SessionData {
                user: Some(user),
                user_id: Some(user_id),
                extra: serde_json::Map::new(),
            }),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "user lookup fallback failed");
                None
            }
        }
    }
}
