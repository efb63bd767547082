//! Error normalization at the HTTP boundary.
//!
//! Every failure becomes an `ApiError` and every `ApiError` is rendered as
//! the same JSON envelope, whatever its origin: deliberately raised (400
//! missing parameter, 403 policy rejection, 404 empty lookup) or wrapped
//! from a backend exception (500).

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;

use portico_core::ApiError;
use portico_graph::CypherError;
use portico_sparql::ProxyError;

use crate::respond::json_response;

/// Server-side wrapper around `ApiError` carrying the axum plumbing.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        Self(error)
    }
}

impl From<CypherError> for AppError {
    fn from(error: CypherError) -> Self {
        // Backend message surfaced verbatim, source detail at debug level.
        tracing::debug!(source = ?error, "Cypher backend failure");
        Self(ApiError::internal(error.to_string()))
    }
}

impl From<ProxyError> for AppError {
    fn from(error: ProxyError) -> Self {
        tracing::debug!(source = ?error, "SPARQL proxy failure");
        Self(ApiError::internal(error.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.0.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(status = self.0.status, message = %self.0.message, "Request failed");
        } else {
            tracing::debug!(status = self.0.status, message = %self.0.message, "Request rejected");
        }
        render(&self.0, status)
    }
}

fn render(error: &ApiError, status: StatusCode) -> Response<Body> {
    json_response(&error.envelope(), status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    #[test]
    fn test_api_error_renders_envelope() {
        let response = AppError(ApiError::bad_request("missing or empty \"query\" parameter"))
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn test_invalid_status_degrades_to_500() {
        let response = AppError(ApiError::new("x", 99)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
