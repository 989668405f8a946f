//! Axum middleware surface for the session gate.
//!
//! Two layers compose per request:
//!
//! 1. [`SessionGateLayer`] resolves the session from the request's credential
//!    signals and attaches the [`SessionRecord`] to the request extensions.
//!    It always continues to the inner service; resolution failure travels
//!    inside the record.
//! 2. [`RequirePermissionsLayer`] reads the attached record, re-reads the
//!    scoping headers, runs the JWT scoping guard and the declared
//!    permission predicate. Guard failure answers 400, denial answers 401,
//!    both with a `{statusCode, error, message}` body; the inner service is
//!    never invoked on a failure path.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use session_gate_sdk::{
    AuthorizeError, CredentialSignals, Requirement, Scoping, SessionRecord, SessionServiceClient,
    permissions,
};
use tower::{Layer, Service};

use crate::config::SessionGateConfig;
use crate::domain;

/// Composition root: builds the resolver once and hands out layers that
/// share the same configuration snapshot.
pub struct SessionGate {
    resolver: Arc<domain::Service>,
    config: Arc<SessionGateConfig>,
}

impl SessionGate {
    /// Build a gate with the HTTP-backed identity client.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the outbound HTTP client cannot be constructed.
    pub fn new(config: SessionGateConfig) -> Result<Self, domain::DomainError> {
        let config = Arc::new(config);
        let client = Arc::new(domain::HttpSessionServiceClient::new(Arc::clone(&config))?);
        Ok(Self::with_client(config, client))
    }

    /// Build a gate over a custom identity client.
    #[must_use]
    pub fn with_client(
        config: Arc<SessionGateConfig>,
        client: Arc<dyn SessionServiceClient>,
    ) -> Self {
        Self {
            resolver: Arc::new(domain::Service::new(client)),
            config,
        }
    }

    /// Layer that resolves the session and attaches it to the request.
    #[must_use]
    pub fn session_layer(&self) -> SessionGateLayer {
        SessionGateLayer {
            state: Arc::new(SessionState {
                resolver: Arc::clone(&self.resolver),
                config: Arc::clone(&self.config),
            }),
        }
    }

    /// Gate requiring at least one of the given permissions.
    #[must_use]
    pub fn require_any<I, P>(&self, permissions: I) -> RequirePermissionsLayer
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        RequirePermissionsLayer::new(Arc::clone(&self.config), Requirement::any(permissions))
    }

    /// Gate requiring every one of the given permissions.
    #[must_use]
    pub fn require_all<I, P>(&self, permissions: I) -> RequirePermissionsLayer
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        RequirePermissionsLayer::new(Arc::clone(&self.config), Requirement::all(permissions))
    }
}

/// Read the scoping signals from the configured header locations.
///
/// Empty values are normalized to "not scoped"; the evaluator re-reads these
/// per check, they are never cached on the session.
#[must_use]
pub fn extract_scoping(headers: &HeaderMap, config: &SessionGateConfig) -> Scoping {
    Scoping::new(
        header_signal(headers, &config.project_id_header),
        header_signal(headers, &config.role_id_header),
    )
}

/// Read the full credential signals from the configured header locations.
#[must_use]
pub fn extract_signals(headers: &HeaderMap, config: &SessionGateConfig) -> CredentialSignals {
    CredentialSignals {
        authorization: header_signal(headers, &config.authorization_header),
        scoping: extract_scoping(headers, config),
    }
}

fn header_signal(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Extractor for the attached [`SessionRecord`].
///
/// Rejects with an internal error when the session layer has not run for
/// this request.
#[derive(Debug, Clone)]
pub struct Session(pub SessionRecord);

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionRecord>()
            .cloned()
            .map(Session)
            .ok_or_else(|| {
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "session record not found - session layer not configured",
                )
            })
    }
}

/// Shared state for the session layer.
struct SessionState {
    resolver: Arc<domain::Service>,
    config: Arc<SessionGateConfig>,
}

/// Layer that resolves the session and attaches the outcome to the request.
#[derive(Clone)]
pub struct SessionGateLayer {
    state: Arc<SessionState>,
}

impl<S> Layer<S> for SessionGateLayer {
    type Service = SessionGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SessionGateService {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Service that resolves the session for each request.
#[derive(Clone)]
pub struct SessionGateService<S> {
    inner: S,
    state: Arc<SessionState>,
}

impl<S> Service<Request<Body>> for SessionGateService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let signals = extract_signals(request.headers(), &state.config);
            let record = state.resolver.resolve(&signals).await;
            // Fail-open at the resolver: the record carries any failure and
            // the pipeline continues; permission gates deny by default.
            request.extensions_mut().insert(record);
            ready_inner.call(request).await
        })
    }
}

/// Shared state for a permission gate.
struct RequireState {
    config: Arc<SessionGateConfig>,
    requirement: Requirement,
}

/// Layer gating the inner service behind a permission requirement.
#[derive(Clone)]
pub struct RequirePermissionsLayer {
    state: Arc<RequireState>,
}

impl RequirePermissionsLayer {
    #[must_use]
    pub fn new(config: Arc<SessionGateConfig>, requirement: Requirement) -> Self {
        Self {
            state: Arc::new(RequireState {
                config,
                requirement,
            }),
        }
    }
}

impl<S> Layer<S> for RequirePermissionsLayer {
    type Service = RequirePermissionsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionsService {
            inner,
            state: Arc::clone(&self.state),
        }
    }
}

/// Service that runs the scoping guard and permission predicate before
/// forwarding the request.
#[derive(Clone)]
pub struct RequirePermissionsService<S> {
    inner: S,
    state: Arc<RequireState>,
}

impl<S> Service<Request<Body>> for RequirePermissionsService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let state = Arc::clone(&self.state);
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let scoping = extract_scoping(request.headers(), &state.config);
            let record = request.extensions().get::<SessionRecord>().cloned();
            if record.is_none() {
                tracing::debug!("no session record attached, evaluating as empty session");
            }
            let record = record.unwrap_or_default();

            match permissions::authorize(record.user(), &state.requirement, &scoping) {
                Ok(()) => ready_inner.call(request).await,
                Err(err) => Ok(authorize_error_to_response(err)),
            }
        })
    }
}

/// Client-facing error body: `{statusCode, error, message}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    error: String,
    message: String,
}

fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    let body = ErrorBody {
        status_code: status.as_u16(),
        error: error.to_owned(),
        message: message.to_owned(),
    };
    (status, Json(body)).into_response()
}

/// Convert an `AuthorizeError` to its response: missing scoping information
/// is a client error, insufficient permissions an authorization error.
fn authorize_error_to_response(err: AuthorizeError) -> Response {
    log_authorize_error(err);
    match err {
        AuthorizeError::MissingScoping => {
            error_response(StatusCode::BAD_REQUEST, "Bad Request", &err.to_string())
        }
        AuthorizeError::PermissionDenied => {
            error_response(StatusCode::UNAUTHORIZED, "Unauthorized", "Permission denied")
        }
    }
}

fn log_authorize_error(err: AuthorizeError) {
    match err {
        AuthorizeError::MissingScoping => tracing::debug!("scoping guard rejected: {err}"),
        AuthorizeError::PermissionDenied => tracing::debug!("authorization denied: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn signals_read_from_configured_locations() {
        let config = SessionGateConfig::default();
        let signals = extract_signals(
            &headers(&[
                ("authorization", "Bearer tok"),
                ("project-id", "p1"),
                ("role-id", "r1"),
            ]),
            &config,
        );

        assert_eq!(signals.authorization.as_deref(), Some("Bearer tok"));
        assert_eq!(signals.scoping.project_id.as_deref(), Some("p1"));
        assert_eq!(signals.scoping.role_id.as_deref(), Some("r1"));
    }

    #[test]
    fn empty_signal_values_mean_not_scoped() {
        let config = SessionGateConfig::default();
        let scoping = extract_scoping(
            &headers(&[("project-id", ""), ("role-id", "  ")]),
            &config,
        );
        assert!(scoping.is_empty());
    }

    #[test]
    fn custom_header_locations_are_honored() {
        let config = SessionGateConfig {
            project_id_header: "x-project".to_owned(),
            ..SessionGateConfig::default()
        };
        let scoping = extract_scoping(
            &headers(&[("x-project", "p1"), ("project-id", "ignored")]),
            &config,
        );
        assert_eq!(scoping.project_id.as_deref(), Some("p1"));
    }

    #[test]
    fn error_body_uses_wire_field_names() {
        let body = ErrorBody {
            status_code: 401,
            error: "Unauthorized".to_owned(),
            message: "Permission denied".to_owned(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "statusCode": 401,
                "error": "Unauthorized",
                "message": "Permission denied"
            })
        );
    }
}
