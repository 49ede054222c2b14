// HTTP Error Mapping
//
// Every failure becomes `{ "error": string }`. Input and gateway failures
// are 400 (store/queue messages passed through verbatim); anything
// unexpected is 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use podgen_core::error::AppError;
use serde_json::json;

pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            // Domain messages surface without the wrapper prefix
            AppError::Domain(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Database(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Queue(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
