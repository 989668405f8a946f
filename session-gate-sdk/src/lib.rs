//! Session Gate SDK
//!
//! This crate provides the public contracts for the `session_gate` crate:
//!
//! - [`SessionServiceClient`] - Transport trait for the upstream identity service
//! - [`SessionRecord`], [`SessionData`], [`SessionUser`] - Session models
//! - [`CredentialSignals`], [`Scoping`] - Request-scoped credential signals
//! - [`Requirement`], [`PermissionMode`] - Declared route requirements
//! - [`SessionResolveError`], [`AuthorizeError`] - Error types
//! - [`permissions`] - Pure permission-evaluation functions
//!
//! ## Usage
//!
//! The evaluation functions are pure and can be called without the
//! middleware surface:
//!
//! ```
//! use session_gate_sdk::{Requirement, Scoping, permissions};
//!
//! let scoping = Scoping::default();
//! let effective = permissions::effective_permissions(None, &scoping);
//! let requirement = Requirement::any(["read"]);
//! assert!(!requirement.satisfied_by(&effective));
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod permissions;

// Re-export main types at crate root
pub use api::SessionServiceClient;
pub use error::{AuthorizeError, SessionResolveError};
pub use models::{
    App, Company, CredentialSignals, PermissionMode, Project, Requirement, Role, Scoping,
    SessionData, SessionRecord, SessionUser,
};
