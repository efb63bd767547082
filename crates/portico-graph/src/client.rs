//! Neo4j connection management and query passthrough.

use neo4rs::{query, ConfigBuilder, Graph};

use portico_core::CypherConfig;

/// Errors from the Cypher backend.
#[derive(Debug, thiserror::Error)]
pub enum CypherError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Failed to convert row: {0}")]
    Serialization(String),
}

/// Thread-safe Cypher client with connection pooling.
///
/// Clone is cheap (inner Arc). The client does not re-validate queries; the
/// safety filter runs before anything reaches it.
#[derive(Clone)]
pub struct CypherClient {
    graph: Graph,
}

impl CypherClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &CypherConfig) -> Result<Self, CypherError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| CypherError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| CypherError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Execute a query and collect all rows as key-value records, in backend
    /// order and unmodified in shape.
    ///
    /// No retry: backend failures surface immediately with the backend's own
    /// message.
    pub async fn execute(&self, cypher: &str) -> Result<Vec<serde_json::Value>, CypherError> {
        let mut stream = self.graph.execute(query(cypher)).await?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await? {
            let record: serde_json::Value = row
                .to()
                .map_err(|e| CypherError::Serialization(e.to_string()))?;
            rows.push(record);
        }
        Ok(rows)
    }
}
