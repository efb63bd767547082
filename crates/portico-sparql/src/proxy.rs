//! The SPARQL proxy client.

use std::collections::HashMap;

use oxrdf::Graph;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use portico_core::SparqlConfig;

use crate::parse::parse_graph;

/// Accept header sent for parsed graph requests, in order of how much we
/// trust our parsers.
const GRAPH_ACCEPT: &str = "text/turtle, application/n-triples;q=0.9, application/rdf+xml;q=0.8";

/// Errors from talking to the upstream SPARQL endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("SPARQL endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SPARQL endpoint answered {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to parse SPARQL response: {0}")]
    Parse(String),
}

/// What the upstream said, passed through largely unmodified.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Client for one configured SPARQL endpoint.
///
/// Clone is cheap (inner reqwest pool). Server-side default parameters are
/// merged into every outgoing request; request-supplied values win on key
/// collision.
#[derive(Clone)]
pub struct SparqlProxy {
    http: reqwest::Client,
    endpoint: String,
    defaults: HashMap<String, String>,
    debug: bool,
}

impl SparqlProxy {
    pub fn new(config: &SparqlConfig, debug: bool) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portico/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            defaults: config.defaults.clone(),
            debug,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Configured defaults overlaid with request parameters.
    fn merged(&self, params: &HashMap<String, String>) -> HashMap<String, String> {
        let mut merged = self.defaults.clone();
        for (key, value) in params {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Issue a query and parse the answer into a graph.
    ///
    /// An empty graph is a successful answer ("no data"), distinct from a
    /// failed one. Non-2xx upstream status is a failure here, unlike on the
    /// transparent proxy path.
    pub async fn request(
        &self,
        query: &str,
        params: &HashMap<String, String>,
    ) -> Result<Graph, ProxyError> {
        let mut form = self.merged(params);
        form.insert("query".to_string(), query.to_string());

        if self.debug {
            tracing::debug!(endpoint = %self.endpoint, query, "SPARQL request");
        }

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, GRAPH_ACCEPT)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        let content_type = header_value(&response, CONTENT_TYPE);
        let body = response.bytes().await?;
        parse_graph(content_type.as_deref(), &body)
    }

    /// Resolve a resource description by URI via an internally built
    /// DESCRIBE query.
    pub async fn describe(
        &self,
        uri: &str,
        params: &HashMap<String, String>,
    ) -> Result<Graph, ProxyError> {
        self.request(&format!("DESCRIBE <{uri}>"), params).await
    }

    /// Forward a GET request transparently: client query-string parameters
    /// merged over defaults, upstream status and body returned as-is.
    pub async fn proxy_get(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<UpstreamResponse, ProxyError> {
        let merged = self.merged(params);
        let query: Vec<(&String, &String)> = merged.iter().collect();
        let response = self.http.get(&self.endpoint).query(&query).send().await?;
        Self::passthrough(response).await
    }

    /// Forward a POST request transparently: the raw body and its content
    /// type go upstream untouched, defaults land in the query string.
    pub async fn proxy_post(
        &self,
        params: &HashMap<String, String>,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<UpstreamResponse, ProxyError> {
        let merged = self.merged(params);
        let query: Vec<(&String, &String)> = merged.iter().collect();
        let mut request = self.http.post(&self.endpoint).query(&query).body(body);
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        Self::passthrough(request.send().await?).await
    }

    async fn passthrough(response: reqwest::Response) -> Result<UpstreamResponse, ProxyError> {
        let status = response.status().as_u16();
        let content_type = header_value(&response, CONTENT_TYPE);
        let body = response.bytes().await?.to_vec();
        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proxy_with_defaults(defaults: &[(&str, &str)]) -> SparqlProxy {
        let config = SparqlConfig {
            endpoint: "http://localhost:3030/ds".to_string(),
            defaults: defaults
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };
        SparqlProxy::new(&config, false).unwrap()
    }

    #[test]
    fn test_request_params_win_on_collision() {
        let proxy = proxy_with_defaults(&[
            ("named-graph-uri", "http://example.org/default"),
            ("timeout", "30"),
        ]);

        let mut params = HashMap::new();
        params.insert(
            "named-graph-uri".to_string(),
            "http://example.org/mine".to_string(),
        );

        let merged = proxy.merged(&params);
        assert_eq!(merged["named-graph-uri"], "http://example.org/mine");
        assert_eq!(merged["timeout"], "30");
    }

    #[test]
    fn test_defaults_apply_when_absent() {
        let proxy = proxy_with_defaults(&[("named-graph-uri", "http://example.org/default")]);
        let merged = proxy.merged(&HashMap::new());
        assert_eq!(merged["named-graph-uri"], "http://example.org/default");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 200), "short");
        let long = "é".repeat(300);
        let cut = truncate(&long, 201);
        assert!(cut.ends_with('…'));
    }
}
