//! portico-core: Shared configuration and error handling for the Portico
//! graph gateway.
//!
//! This crate provides the pieces every gateway component needs:
//! - `GatewayConfig` loaded from file + environment, read-only after startup
//! - `ApiError`, the uniform error shape every failure is normalized into
//! - `QueryBackend`, the closed set of query backends the gateway dispatches to

pub mod config;
pub mod error;

pub use config::{ConfigError, CypherConfig, GatewayConfig, SparqlConfig};
pub use error::ApiError;

/// The closed set of query backends. Dispatch on this enum is the single
/// branch point between the two halves of the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryBackend {
    Cypher,
    Sparql,
}

impl QueryBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cypher => "cypher",
            Self::Sparql => "sparql",
        }
    }
}
