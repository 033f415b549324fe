use airline_demand::AirlineDemandError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<AirlineDemandError> for AppError {
    fn from(e: AirlineDemandError) -> Self {
        match &e {
            AirlineDemandError::NotFound(msg) => AppError::not_found(msg.clone()),
            AirlineDemandError::InvalidArgument(msg) => AppError::bad_request(msg.clone()),
            AirlineDemandError::DatasetUnavailable(_) | AirlineDemandError::MissingApiKey => {
                AppError::unavailable(e.to_string())
            }
            AirlineDemandError::Api { .. } | AirlineDemandError::Http(_) => {
                AppError::bad_gateway(e.to_string())
            }
            _ => AppError::internal(e.to_string()),
        }
    }
}
