//! The uniform API error shape.
//!
//! Every failure in the gateway, whether raised deliberately at a decision
//! point or wrapped from a backend exception, ends up as an `ApiError` and is
//! rendered at the HTTP boundary as `{"message": ...}` with the carried
//! status code.

use thiserror::Error;

/// A terminal error: message plus HTTP status. Constructed at the point of
/// failure and never mutated afterwards.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// 400: a request parameter is missing or malformed.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, 400)
    }

    /// 403: the safety policy rejected the query.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(message, 403)
    }

    /// 404: a lookup came back empty.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message, 404)
    }

    /// 500: backend failure or any otherwise unhandled error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message, 500)
    }

    /// The JSON envelope rendered to clients.
    pub fn envelope(&self) -> serde_json::Value {
        serde_json::json!({ "message": self.message })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_carry_status() {
        assert_eq!(ApiError::bad_request("x").status, 400);
        assert_eq!(ApiError::forbidden("x").status, 403);
        assert_eq!(ApiError::not_found("x").status, 404);
        assert_eq!(ApiError::internal("x").status, 500);
    }

    #[test]
    fn test_envelope_shape() {
        let err = ApiError::forbidden("Cypher query is not allowed!");
        assert_eq!(
            err.envelope(),
            serde_json::json!({ "message": "Cypher query is not allowed!" })
        );
    }
}
