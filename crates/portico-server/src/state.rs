//! Shared application state.
//!
//! Everything in here is read-only after startup or a cheap Arc-backed
//! clone, so request handling stays stateless.

use std::sync::Arc;

use portico_core::GatewayConfig;
use portico_graph::CypherClient;
use portico_sparql::SparqlProxy;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// Absent when no Cypher backend is configured; `/api/cypher` then
    /// answers with an error envelope.
    pub cypher: Option<CypherClient>,
    pub sparql: SparqlProxy,
}
