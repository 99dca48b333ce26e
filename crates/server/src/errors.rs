use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::ServiceError;
use tracing::{error, info};

/// JSON error response: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => {
                info!(event = "rejected", reason = "validation", error = %msg, "request rejected");
                Self::forbidden(msg)
            }
            ServiceError::NotFound(msg) => {
                info!(event = "rejected", reason = "not_found", error = %msg, "request rejected");
                Self::forbidden(msg)
            }
            ServiceError::MissingParameter(msg) => {
                info!(
                    event = "rejected",
                    reason = "missing_parameter",
                    error = %msg,
                    "request rejected"
                );
                Self::new(StatusCode::BAD_REQUEST, msg)
            }
            ServiceError::Storage(msg) => {
                error!(error = %msg, "storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}
