//! portico-graph: Cypher backend client for the Portico graph gateway.
//!
//! All Cypher traffic flows through this crate: the safety filter classifies
//! a query as read-only or mutating before the client ever sees it, and the
//! client hands validated queries to the Neo4j driver unchanged.

pub mod client;
pub mod safety;

pub use client::{CypherClient, CypherError};
pub use safety::{classify, SafetyVerdict};
