//! CLI entry point for the Portico graph gateway.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use portico_core::GatewayConfig;
use portico_graph::CypherClient;
use portico_sparql::SparqlProxy;

use portico_server::{router, AppState};

#[derive(Parser)]
#[command(name = "portico")]
#[command(about = "HTTP gateway for Cypher and SPARQL graph backends")]
struct Cli {
    /// Server port.
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Bind address.
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Config file prefix (default: portico, resolving portico.toml etc.).
    #[arg(short, long, default_value = "portico")]
    config: String,

    /// Force the debug flag on.
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GatewayConfig::load(&cli.config, cli.debug)?;

    // The debug flag gates source-error logging in the error normalizer,
    // which emits at debug level. RUST_LOG still overrides.
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).init();

    let sparql = SparqlProxy::new(&config.sparql, config.debug)?;
    tracing::info!(endpoint = %sparql.endpoint(), "SPARQL proxy configured");

    let cypher = match &config.cypher {
        Some(cypher_config) => Some(CypherClient::connect(cypher_config).await?),
        None => {
            tracing::warn!("No Cypher backend configured; /api/cypher will answer with errors");
            None
        }
    };

    let state = AppState {
        config: Arc::new(config),
        cypher,
        sparql,
    };

    let listener = tokio::net::TcpListener::bind((cli.bind.as_str(), cli.port)).await?;
    tracing::info!(addr = %listener.local_addr()?, "Portico gateway listening");
    axum::serve(listener, router(state)).await?;

    Ok(())
}
