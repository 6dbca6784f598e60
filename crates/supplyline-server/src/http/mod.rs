//! HTTP handlers and the client-facing error contract.
//!
//! Error bodies are stable: `{"error": "<CODE>", "message": "..."}`, with a
//! `"fields"` map added on validation failures.

pub mod orders;
pub mod performance;
pub mod token;
pub mod vendors;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use supplyline_core::error::SupplyError;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Response-side wrapper for the shared error type.
#[derive(Debug)]
pub struct ApiError(pub SupplyError);

impl From<SupplyError> for ApiError {
    fn from(err: SupplyError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SupplyError::BadRequest(_) | SupplyError::Validation(_) => StatusCode::BAD_REQUEST,
            SupplyError::AuthFailed => StatusCode::UNAUTHORIZED,
            SupplyError::NotFound(_) => StatusCode::NOT_FOUND,
            SupplyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
        }

        let mut body = json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        });
        if let Some(fields) = self.0.fields() {
            body["fields"] = json!(fields);
        }
        (status, Json(body)).into_response()
    }
}

/// Malformed or non-JSON bodies surface as 400, not the extractor default.
pub(crate) fn reject_body(rej: JsonRejection) -> ApiError {
    SupplyError::BadRequest(format!("invalid json body: {rej}")).into()
}
