use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::store::repository::LedgerError;

/// JSON error body: `{"error": "<message>"}` with a matching status code.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    error: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientFunds { .. } => Self::bad_request("Not enough blocks"),
            other => {
                tracing::error!("ledger operation failed: {}", other);
                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_only_the_error_field() {
        let err = ApiError::bad_request("Not enough blocks");
        let body = serde_json::to_value(&err).unwrap();
        assert_eq!(body, serde_json::json!({"error": "Not enough blocks"}));
    }

    #[test]
    fn insufficient_funds_maps_to_bad_request() {
        let err: ApiError = LedgerError::InsufficientFunds { cost: 10, blocks: 0 }.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.error, "Not enough blocks");
    }

    #[test]
    fn storage_faults_stay_opaque() {
        let err: ApiError = LedgerError::InvalidData("bad row".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error, "internal error");
    }
}
