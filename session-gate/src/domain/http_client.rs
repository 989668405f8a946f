//! HTTP transport for the upstream identity service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use session_gate_sdk::{CredentialSignals, SessionData, SessionResolveError, SessionServiceClient, SessionUser};

use crate::config::SessionGateConfig;

use super::DomainError;

/// Response envelope used by both identity-service endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// `SessionServiceClient` backed by plain GET requests.
///
/// Every call runs under the configured timeout; there are no retries and
/// no caching.
pub struct HttpSessionServiceClient {
    http: reqwest::Client,
    config: Arc<SessionGateConfig>,
}

impl HttpSessionServiceClient {
    /// Build a client from the configuration snapshot.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: Arc<SessionGateConfig>) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| DomainError::InvalidConfig(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn get_enveloped<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, DomainError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Upstream(format!(
                "identity service returned {status}"
            )));
        }
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| DomainError::Upstream(format!("unparseable identity response: {e}")))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl SessionServiceClient for HttpSessionServiceClient {
    async fn fetch_session(
        &self,
        signals: &CredentialSignals,
    ) -> Result<SessionData, SessionResolveError> {
        let mut request = self.http.get(&self.config.session_url);
        if let Some(authorization) = signals.authorization.as_deref() {
            request = request.header(self.config.authorization_header.as_str(), authorization);
        }
        // Scoping headers express "not scoping by this dimension" through
        // omission, never through an empty value.
        if let Some(project_id) = signals.scoping.project_id.as_deref() {
            request = request.header(self.config.project_id_header.as_str(), project_id);
        }
        if let Some(role_id) = signals.scoping.role_id.as_deref() {
            request = request.header(self.config.role_id_header.as_str(), role_id);
        }

        self.get_enveloped(request).await.map_err(Into::into)
    }

    async fn fetch_user(&self, user_id: &str) -> Result<SessionUser, SessionResolveError> {
        let url = format!(
            "{}/{user_id}",
            self.config.user_lookup_url.trim_end_matches('/')
        );
        self.get_enveloped(self.http.get(url)).await.map_err(Into::into)
    }
}
