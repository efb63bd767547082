//! portico-server: HTTP gateway for Cypher and SPARQL graph backends.
//!
//! The request path is: content negotiation (what shape does the client
//! want) and safety filtering (is the query allowed) happen before any
//! backend is contacted; backend results or failures then flow through the
//! response formatter and error normalizer into the final response.

pub mod error;
pub mod negotiate;
pub mod render;
pub mod respond;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::router;
pub use state::AppState;
