//! Gateway configuration.
//!
//! Loaded from (in priority order):
//! 1. Environment variables (`PORTICO__` prefix)
//! 2. Config file (`portico.toml` or `portico.yaml`)
//! 3. Defaults
//!
//! The loaded config is owned by the process for its lifetime and passed to
//! each component at construction. Nothing reads it through ambient globals.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing stage directory: {path}")]
    MissingStageDir { path: String },
}

/// Top-level gateway configuration, read-only after startup.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Upstream SPARQL endpoint and its default protocol parameters.
    pub sparql: SparqlConfig,

    /// Optional Cypher backend. Without it `/api/cypher` answers 500.
    #[serde(default)]
    pub cypher: Option<CypherConfig>,

    /// Debug flag: logs wrapped backend errors with their source.
    #[serde(default)]
    pub debug: bool,

    /// Base directory for staged imports. The stage for collection `id`
    /// is `<stage>/<id>`.
    #[serde(default)]
    pub stage: Option<String>,

    /// URI prefix that collection ids are appended to for DESCRIBE lookups.
    #[serde(default = "default_collection_base")]
    pub collection_base: String,
}

/// Upstream SPARQL endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlConfig {
    /// SPARQL protocol endpoint URL.
    pub endpoint: String,

    /// Server-side default query parameters (e.g. `named-graph-uri`).
    /// Request-supplied parameters win on key collision.
    #[serde(default)]
    pub defaults: HashMap<String, String>,
}

/// Connection parameters for the Cypher backend.
#[derive(Debug, Clone, Deserialize)]
pub struct CypherConfig {
    #[serde(default = "default_cypher_uri")]
    pub uri: String,

    #[serde(default = "default_cypher_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_collection_base() -> String {
    "https://graph.example.org/collection/".to_string()
}

fn default_cypher_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_cypher_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl GatewayConfig {
    /// Load from `<file_prefix>.{toml,yaml,...}` layered under `PORTICO__`
    /// environment variables. `debug` forces the debug flag on.
    pub fn load(file_prefix: &str, debug: bool) -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::File::with_name(file_prefix).required(false))
            .add_source(
                config::Environment::with_prefix("PORTICO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut gateway: GatewayConfig = cfg.try_deserialize()?;
        if debug {
            gateway.debug = true;
        }
        gateway.validate()?;
        Ok(gateway)
    }

    /// Check that configured paths actually exist. Called once at startup so
    /// a bad deployment fails fast instead of 404ing at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(stage) = &self.stage {
            if !Path::new(stage).is_dir() {
                return Err(ConfigError::MissingStageDir {
                    path: stage.clone(),
                });
            }
        }
        Ok(())
    }

    /// The stage directory for a collection, if one is configured and exists.
    pub fn stage_dir(&self, id: u64) -> Option<PathBuf> {
        let dir = Path::new(self.stage.as_deref()?).join(id.to_string());
        dir.is_dir().then_some(dir)
    }

    /// The URI a collection id resolves to.
    pub fn collection_uri(&self, id: u64) -> String {
        format!("{}{}", self.collection_base, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> GatewayConfig {
        GatewayConfig {
            sparql: SparqlConfig {
                endpoint: "http://localhost:3030/ds".to_string(),
                defaults: HashMap::new(),
            },
            cypher: None,
            debug: false,
            stage: None,
            collection_base: default_collection_base(),
        }
    }

    #[test]
    fn test_collection_uri() {
        let config = minimal();
        assert_eq!(
            config.collection_uri(7),
            "https://graph.example.org/collection/7"
        );
    }

    #[test]
    fn test_validate_rejects_missing_stage() {
        let mut config = minimal();
        config.stage = Some("/nonexistent/portico-stage".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingStageDir { .. })
        ));
    }

    #[test]
    fn test_stage_dir_requires_existing_subdir() {
        let base = tempfile::tempdir().unwrap();
        let mut config = minimal();
        config.stage = Some(base.path().to_string_lossy().into_owned());
        config.validate().unwrap();

        // No per-collection subdir yet.
        assert!(config.stage_dir(3).is_none());

        std::fs::create_dir(base.path().join("3")).unwrap();
        assert_eq!(config.stage_dir(3), Some(base.path().join("3")));
    }

    #[test]
    fn test_cypher_defaults() {
        let cypher: CypherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cypher.uri, "bolt://localhost:7687");
        assert_eq!(cypher.user, "neo4j");
        assert_eq!(cypher.max_connections, 16);
        assert_eq!(cypher.fetch_size, 256);
    }
}
