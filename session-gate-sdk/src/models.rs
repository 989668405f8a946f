//! Domain models for the session gate.
//!
//! The organizational hierarchy mirrors the upstream identity service's wire
//! format (`_id`, `sessionType`, `userId` field names). Every hierarchy field
//! is `#[serde(default)]` so a missing or partial shape deserializes to empty
//! collections — the evaluator then sees zero permissions instead of an
//! error.

use serde::{Deserialize, Serialize};

use crate::error::SessionResolveError;

/// Session type value that triggers the scoping guard.
pub const SESSION_TYPE_JWT: &str = "jwt";

/// Credential signals extracted from the inbound request.
///
/// The authorization token is forwarded verbatim to the session service; the
/// scoping signals restrict hierarchy traversal and are forwarded as headers
/// only when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSignals {
    /// Opaque bearer token, exactly as read from the request.
    pub authorization: Option<String>,
    /// Optional tenant-scoping signals.
    pub scoping: Scoping,
}

impl CredentialSignals {
    /// Signals carrying only an authorization token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            authorization: Some(token.into()),
            scoping: Scoping::default(),
        }
    }
}

/// Tenant-scoping filters applied during hierarchy traversal.
///
/// Absence is meaningful: a `None` dimension means "no scoping requested",
/// not "scope to the empty value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoping {
    pub project_id: Option<String>,
    pub role_id: Option<String>,
}

impl Scoping {
    #[must_use]
    pub fn new(project_id: Option<String>, role_id: Option<String>) -> Self {
        Self {
            project_id,
            role_id,
        }
    }

    /// True when neither dimension is scoped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.project_id.is_none() && self.role_id.is_none()
    }
}

/// Outcome of session resolution, attached to the request for the remainder
/// of its lifecycle.
///
/// `data` and `error` are mutually informative: a failed resolution carries
/// the original failure alongside `data: None`, and downstream permission
/// checks observe an empty-permission session rather than aborting the
/// request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionRecord {
    pub data: Option<SessionData>,
    pub error: Option<SessionResolveError>,
}

impl SessionRecord {
    /// A successfully resolved session.
    #[must_use]
    pub fn resolved(data: SessionData) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// A failed resolution carrying the original failure.
    #[must_use]
    pub fn failed(error: SessionResolveError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    /// The resolved user, when present.
    #[must_use]
    pub fn user(&self) -> Option<&SessionUser> {
        self.data.as_ref().and_then(|data| data.user.as_ref())
    }
}

/// Session payload returned by the session service (or synthesized by the
/// user-lookup fallback).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
    /// Set by the fallback path from the token's `userId` claim.
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Opaque upstream fields, preserved untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The user carried by a session, holding the organizational hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionUser {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Session classification, e.g. `"basic"` or `"jwt"`.
    #[serde(rename = "sessionType", skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    pub company: Vec<Company>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SessionUser {
    /// Whether the scoping guard applies to this session.
    #[must_use]
    pub fn is_jwt_session(&self) -> bool {
        self.session_type.as_deref() == Some(SESSION_TYPE_JWT)
    }
}

/// Company node: an ordered collection of projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub project: Vec<Project>,
}

/// Project node: roles and apps, scoped by `_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: Vec<Role>,
    pub app: Vec<App>,
}

/// Role node carrying a permission set, scoped by `_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub permissions: Vec<String>,
}

/// App node carrying a permission set. Apps are never role-scoped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub permissions: Vec<String>,
}

/// Predicate mode for comparing a requirement against the effective
/// permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Grant when the intersection with the effective set is non-empty.
    Any,
    /// Grant when every required permission is in the effective set.
    All,
}

/// A declared route requirement: a set of permission names plus a predicate
/// mode. One per authorization check, immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub permissions: Vec<String>,
    pub mode: PermissionMode,
}

impl Requirement {
    /// ANY-mode requirement.
    #[must_use]
    pub fn any<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMode::Any,
        }
    }

    /// ALL-mode requirement.
    #[must_use]
    pub fn all<I, P>(permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMode::All,
        }
    }

    /// Evaluate the predicate against an effective permission set.
    #[must_use]
    pub fn satisfied_by(&self, effective: &std::collections::HashSet<String>) -> bool {
        match self.mode {
            PermissionMode::Any => self
                .permissions
                .iter()
                .any(|permission| effective.contains(permission)),
            PermissionMode::All => self
                .permissions
                .iter()
                .all(|permission| effective.contains(permission)),
        }
    }
}
