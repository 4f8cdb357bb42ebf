use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde_json::json;
use thiserror::Error;

/// Failures while loading the classifier or turning an image into a prediction.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Model file not found at {0}")]
    ModelNotFound(String),

    #[error("ONNX Runtime error: {0}")]
    OrtError(#[from] ort::Error),

    #[error("{0}")]
    ImageError(#[from] image::ImageError),

    #[error("Shape error: {0}")]
    ShapeError(#[from] ShapeError),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Model produced an empty output")]
    EmptyOutput,

    #[error("Model produced a non-finite probability at index {index}")]
    NonFiniteOutput { index: usize },

    #[error("Predicted class index {index} has no label ({labels} labels configured)")]
    LabelOutOfRange { index: usize, labels: usize },

    #[error("Inference session is unavailable: {0}")]
    SessionPoisoned(String),

    #[error("Inference task failed: {0}")]
    TaskFailed(String),
}

/// Errors surfaced to HTTP callers as `{"detail": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("File must be an image")]
    NotAnImage,

    #[error("Missing upload field 'file'")]
    MissingFile,

    #[error("Invalid multipart payload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Invalid multipart payload: {0}")]
    MultipartRejected(#[from] MultipartRejection),

    #[error("Error saving file: {0}")]
    Save(#[source] std::io::Error),

    #[error("Error processing image: {0}")]
    Processing(#[from] InferenceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAnImage => StatusCode::BAD_REQUEST,
            ApiError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Multipart(e) => e.status(),
            ApiError::MultipartRejected(e) => e.status(),
            ApiError::Save(_) | ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let body = Json(json!({
            "detail": self.to_string()
        }));

        (status, body).into_response()
    }
}
