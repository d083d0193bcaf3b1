//! API error handling

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
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

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "type": match self.status {
                    StatusCode::SERVICE_UNAVAILABLE => "backend_unavailable",
                    status if status.is_client_error() => "invalid_request_error",
                    _ => "server_error",
                },
                "code": self.status.as_str()
            }
        }));
        (self.status, body).into_response()
    }
}

impl From<leafcheck_core::Error> for ApiError {
    fn from(err: leafcheck_core::Error) -> Self {
        match &err {
            leafcheck_core::Error::InvalidImage(_) => {
                warn!("Rejected upload: {}", err);
                ApiError::bad_request(err.to_string())
            }
            leafcheck_core::Error::InferenceUnavailable(_) => {
                error!("Inference failed: {}", err);
                ApiError::unavailable(err.to_string())
            }
            _ => {
                error!("Prediction failed: {}", err);
                ApiError::internal(err.to_string())
            }
        }
    }
}

/// Keeps the status axum assigns, e.g. 413 when the body limit is hit.
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        warn!("Rejected multipart upload: {}", err.body_text());
        Self {
            status: err.status(),
            message: format!("Failed reading multipart upload: {}", err.body_text()),
        }
    }
}
