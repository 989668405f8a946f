//! Domain layer for the session gate.

pub mod claims;
pub mod error;
pub mod http_client;
pub mod service;

pub use error::DomainError;
pub use http_client::HttpSessionServiceClient;
pub use service::Service;
