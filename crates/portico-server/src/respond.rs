//! Response formatting: JSON envelopes and content-negotiated RDF bodies.

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

use oxrdf::Graph;
use portico_core::ApiError;

use crate::negotiate::NegotiationResult;
use crate::render::serialize_graph;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Build a JSON response with the gateway's fixed headers: utf-8 JSON
/// content type, a `mimetype` header mirroring it, and a permissive CORS
/// header. Key order is stable (serde_json maps are sorted).
pub fn json_response(value: &serde_json::Value, status: StatusCode) -> Response<Body> {
    let body = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    headers.insert("mimetype", HeaderValue::from_static("application/json"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// Render a graph in the negotiated serialization.
///
/// An empty graph means the looked-up resource does not exist: 404 with a
/// plain-text body, not an error envelope. Serialization failures surface as
/// `ApiError` so they render as the uniform envelope like every other error.
pub fn graph_response(
    graph: &Graph,
    negotiated: &NegotiationResult,
) -> Result<Response<Body>, ApiError> {
    if graph.is_empty() {
        return Ok(plain_text(StatusCode::NOT_FOUND, "Not found"));
    }

    let body = serialize_graph(graph, negotiated.format)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let mut response = Response::new(Body::from(body));
    if let Ok(content_type) = HeaderValue::from_str(negotiated.media_type) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    Ok(response)
}

/// The "render as page" outcome of negotiation for a collection lookup: a
/// minimal HTML shell (rich templating is out of scope for the gateway).
///
/// An empty graph is a 404 page, still with the negotiated HTML content
/// type.
pub fn page_response(uri: &str, graph: &Graph, stage: Option<&str>) -> Response<Body> {
    let status = if graph.is_empty() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };
    html_response(status, collection_page(uri, graph, stage))
}

fn collection_page(uri: &str, graph: &Graph, stage: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("<!DOCTYPE html>\n<html><head><title>Collection</title></head><body>\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(uri)));

    if graph.is_empty() {
        body.push_str("<p>No description available.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for triple in graph.iter() {
            body.push_str(&format!("<li>{}</li>\n", escape_html(&triple.to_string())));
        }
        body.push_str("</ul>\n");
    }

    if let Some(stage) = stage {
        body.push_str(&format!(
            "<p><a href=\"{}\">Staged import files</a></p>\n",
            escape_html(stage)
        ));
    }

    body.push_str("</body></html>\n");
    body
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn html_response(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

fn plain_text(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
