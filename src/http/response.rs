use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower::{BoxError, timeout::error::Elapsed};
use tracing::{error, warn};

use crate::error::{AnalysisError, AppError, RequestError, StorageError};

/// `{"error": message}`, the shape every failing route answers with.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn request_error_status(error: &RequestError) -> StatusCode {
    match error {
        RequestError::NotMultipart(_) => StatusCode::BAD_REQUEST,
        RequestError::MultipartError(e) => e.status(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::RequestError(e) => {
                warn!("Rejected request: {}", e);
                error_response(request_error_status(&e), &e.to_string())
            }
            AppError::AnalysisError(
                e @ (AnalysisError::MissingField(_) | AnalysisError::InvalidCoordinates { .. }),
            ) => {
                warn!("Rejected analysis request: {}", e);
                error_response(StatusCode::BAD_REQUEST, &e.to_string())
            }
            AppError::AnalysisError(e) => {
                error!("Error processing image: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error processing image")
            }
            AppError::StorageError(StorageError::NotFound(id)) => {
                warn!("Image not found: {}", id);
                not_found()
            }
            AppError::StorageError(e @ StorageError::InvalidImageId(_)) => {
                warn!("Rejected image id: {}", e);
                error_response(StatusCode::BAD_REQUEST, "Invalid image id")
            }
            other => {
                error!("Internal error: {}", other);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

/// Maps a boxed pipeline error: the timeout layer's [`Elapsed`] or an
/// [`AnalysisError`] from the service itself.
pub fn analysis_failure(error: BoxError) -> Response {
    if error.is::<Elapsed>() {
        warn!("Image analysis timed out");
        return error_response(StatusCode::GATEWAY_TIMEOUT, "Image analysis timed out");
    }
    match error.downcast::<AnalysisError>() {
        Ok(analysis_error) => AppError::AnalysisError(*analysis_error).into_response(),
        Err(other) => {
            error!("Error processing image: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
