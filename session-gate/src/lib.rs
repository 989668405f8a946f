//! Session Gate
//!
//! Request-pipeline authorization gate for axum services: resolves a
//! caller's session from an upstream identity service, then decides whether
//! the caller's effective permission set satisfies a route's declared
//! requirement.
//!
//! Composition is two layers, applied in order:
//!
//! ```ignore
//! let gate = SessionGate::new(SessionGateConfig::default())?;
//!
//! let router = Router::new()
//!     .route("/reports", get(reports_handler))
//!     .layer(gate.require_any(["reports.read"]))
//!     .layer(gate.session_layer());
//! ```
//!
//! The session layer always continues to the next stage; failed resolution
//! is recorded in the attached [`sdk::SessionRecord`] and the permission
//! gate then denies by default. Handlers that want the record directly can
//! use the [`Session`] extractor, and callers that want a verdict without
//! the response-writing side effect can use
//! [`sdk::permissions::any_granted`] / [`sdk::permissions::all_granted`].

pub mod config;
pub mod domain;
pub mod middleware;

pub use config::SessionGateConfig;
pub use middleware::{
    RequirePermissionsLayer, Session, SessionGate, SessionGateLayer, extract_scoping,
    extract_signals,
};

// Re-export the contracts crate for consumers.
pub use session_gate_sdk as sdk;
