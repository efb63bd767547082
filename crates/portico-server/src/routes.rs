//! HTTP routes and handlers.

use std::collections::HashMap;
use std::path::Path as FsPath;

use axum::body::{Body, Bytes};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use portico_core::{ApiError, QueryBackend};
use portico_graph::safety;
use portico_sparql::UpstreamResponse;

use crate::error::AppError;
use crate::negotiate::{negotiate, Negotiated};
use crate::respond::{graph_response, json_response, page_response};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/api/cypher", get(cypher_get).post(cypher_post))
        .route("/api/sparql", get(sparql_get).post(sparql_post))
        .route("/collection/{id}", get(collection))
        .route("/collection/{id}/files", get(stage_listing))
        .route("/collection/{id}/files/{*path}", get(stage_file))
        .with_state(state)
}

/// Liveness document: name, version, configured backends.
async fn status(State(state): State<AppState>) -> Response {
    let mut backends = serde_json::Map::new();
    backends.insert(
        QueryBackend::Cypher.as_str().to_string(),
        serde_json::json!(state.cypher.is_some()),
    );
    backends.insert(
        QueryBackend::Sparql.as_str().to_string(),
        serde_json::json!(state.sparql.endpoint()),
    );

    json_response(
        &serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "backends": backends,
        }),
        StatusCode::OK,
    )
}

// ── Cypher API ───────────────────────────────────────────────────

async fn cypher_get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let query = params.get("query").cloned().unwrap_or_default();
    run_cypher(&state, &query).await
}

async fn cypher_post(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    body: String,
) -> Result<Response, AppError> {
    // Query parameter wins over the raw body, matching the GET form.
    let query = params.get("query").cloned().unwrap_or(body);
    run_cypher(&state, &query).await
}

/// The Cypher decision point: parameter validation, then the safety filter,
/// then (and only then) the backend.
async fn run_cypher(state: &AppState, query: &str) -> Result<Response, AppError> {
    if query.is_empty() {
        return Err(ApiError::bad_request("missing or empty \"query\" parameter").into());
    }

    let verdict = safety::classify(query);
    if !verdict.allowed {
        tracing::debug!(rule = verdict.rule, "Cypher query blocked");
        return Err(ApiError::forbidden("Cypher query is not allowed!").into());
    }

    let Some(client) = &state.cypher else {
        return Err(ApiError::internal("Cypher backend is not configured").into());
    };

    let rows = client.execute(query).await?;
    Ok(json_response(
        &serde_json::Value::Array(rows),
        StatusCode::OK,
    ))
}

// ── SPARQL passthrough ───────────────────────────────────────────

async fn sparql_get(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let upstream = state.sparql.proxy_get(&params).await?;
    Ok(upstream_response(upstream))
}

async fn sparql_post(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let upstream = state
        .sparql
        .proxy_post(&params, content_type, body.to_vec())
        .await?;
    Ok(upstream_response(upstream))
}

/// Mirror the upstream's status, content type, and body.
fn upstream_response(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() =
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    if let Some(content_type) = upstream
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response
}

// ── Collection lookup ────────────────────────────────────────────

async fn collection(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    let format = params.get("format").map(String::as_str);
    let negotiated = negotiate(accept, format);

    let uri = state.config.collection_uri(id);
    let mut query_params = HashMap::new();
    query_params.insert(
        "named-graph-uri".to_string(),
        state.config.collection_base.clone(),
    );
    let graph = state.sparql.describe(&uri, &query_params).await?;

    tracing::debug!(uri = %uri, triples = graph.len(), "Collection description");

    match negotiated {
        Negotiated::Page => {
            let stage = state.config.stage_dir(id).map(|_| format!("./{id}/files"));
            Ok(page_response(&uri, &graph, stage.as_deref()))
        }
        Negotiated::Rdf(result) => Ok(graph_response(&graph, &result)?),
    }
}

// ── Staged imports ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct FileInfo {
    name: String,
    time: DateTime<Utc>,
    size: u64,
}

/// List staged files for a collection as JSON records.
async fn stage_listing(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let Some(dir) = state.config.stage_dir(id) else {
        return Err(ApiError::not_found(format!("No staged files for collection {id}")).into());
    };

    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read stage directory: {e}")))?;
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read stage directory: {e}")))?
    {
        if let Some(info) = file_info(&entry).await {
            files.push(info);
        }
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));

    let value = serde_json::to_value(files)
        .map_err(|e| ApiError::internal(format!("Failed to encode file listing: {e}")))?;
    Ok(json_response(&value, StatusCode::OK))
}

async fn file_info(entry: &tokio::fs::DirEntry) -> Option<FileInfo> {
    let metadata = entry.metadata().await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    let time = metadata.modified().map(DateTime::<Utc>::from).ok()?;
    Some(FileInfo {
        name: entry.file_name().to_string_lossy().into_owned(),
        time,
        size: metadata.len(),
    })
}

/// Serve one staged file out of the collection's stage directory.
async fn stage_file(
    State(state): State<AppState>,
    Path((id, path)): Path<(u64, String)>,
) -> Result<Response, AppError> {
    let Some(dir) = state.config.stage_dir(id) else {
        return Err(ApiError::not_found(format!("No staged files for collection {id}")).into());
    };
    serve_from(&dir, &path).await
}

async fn serve_from(dir: &FsPath, path: &str) -> Result<Response, AppError> {
    let request = Request::builder()
        .uri(format!("/{path}"))
        .body(Body::empty())
        .map_err(|_| ApiError::bad_request("Invalid file path"))?;

    match ServeDir::new(dir).oneshot(request).await {
        Ok(response) => Ok(response.map(Body::new).into_response()),
        Err(never) => match never {},
    }
}
