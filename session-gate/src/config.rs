//! Configuration for the session gate.
//!
//! Constructed once at composition time and shared as an immutable snapshot
//! (`Arc<SessionGateConfig>`); concurrent requests read it without
//! coordination.

use serde::{Deserialize, Serialize};

/// Configuration for the session gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct SessionGateConfig {
    /// Session-service endpoint, called once per request.
    pub session_url: String,
    /// User-lookup endpoint, called only on the fallback path
    /// (`<user_lookup_url>/<userId>`).
    pub user_lookup_url: String,
    /// Header carrying the authorization token.
    pub authorization_header: String,
    /// Header carrying the optional project scoping signal.
    pub project_id_header: String,
    /// Header carrying the optional role scoping signal.
    pub role_id_header: String,
    /// Bound on each outbound call so a slow upstream cannot stall the
    /// request pipeline.
    pub request_timeout_ms: u64,
}

impl Default for SessionGateConfig {
    fn default() -> Self {
        Self {
            session_url: default_session_url(),
            user_lookup_url: default_user_lookup_url(),
            authorization_header: default_authorization_header(),
            project_id_header: default_project_id_header(),
            role_id_header: default_role_id_header(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_session_url() -> String {
    "http://localhost:3000/v2/sessions".to_owned()
}

fn default_user_lookup_url() -> String {
    "http://localhost:3000/v2/users".to_owned()
}

fn default_authorization_header() -> String {
    "authorization".to_owned()
}

fn default_project_id_header() -> String {
    "project-id".to_owned()
}

fn default_role_id_header() -> String {
    "role-id".to_owned()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}
