//! portico-sparql: SPARQL endpoint proxy for the Portico graph gateway.
//!
//! Two modes of talking to the upstream endpoint:
//! - `SparqlProxy::request` issues a query (with server-side default
//!   parameters merged in) and parses the RDF answer into an `oxrdf::Graph`.
//! - `SparqlProxy::proxy_get` / `proxy_post` forward a client request
//!   transparently and hand back whatever the upstream said.
//!
//! No safety filtering happens here; protecting the SPARQL endpoint is the
//! endpoint's own responsibility.

pub mod parse;
pub mod proxy;

pub use proxy::{ProxyError, SparqlProxy, UpstreamResponse};
