use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{ApiError, InferenceError};
use crate::model::labels::Prediction;
use crate::observability::{record_inference_duration, record_prediction};
use crate::preprocessing::image::load_and_preprocess;
use crate::server::types::*;

/// Multipart field carrying the uploaded image.
pub const UPLOAD_FIELD: &str = "file";

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Wheat Disease Detection API",
    })
}

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.render()
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let result = match multipart {
        Ok(multipart) => run_predict(&state, multipart).await,
        Err(rejection) => Err(rejection.into()),
    };
    record_prediction(match &result {
        Ok(_) => "success",
        Err(e) if e.status().is_client_error() => "rejected",
        Err(_) => "error",
    });
    result.map(Json)
}

async fn run_predict(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<PredictResponse, ApiError> {
    // 1. Find the upload and check its declared type before reading the body
    let field = loop {
        match multipart.next_field().await? {
            Some(field) if field.name() == Some(UPLOAD_FIELD) => break field,
            Some(_) => continue,
            None => return Err(ApiError::MissingFile),
        }
    };

    let is_image = field
        .content_type()
        .is_some_and(|content_type| content_type.starts_with("image/"));
    if !is_image {
        return Err(ApiError::NotAnImage);
    }

    let original_name = field.file_name().unwrap_or_default().to_string();
    let bytes = field.bytes().await?;

    // 2. Persist under the public directory
    let stored = state
        .store
        .save(&original_name, &bytes)
        .await
        .map_err(ApiError::Save)?;
    tracing::info!(file = %stored.file_name, bytes = bytes.len(), "saved upload");

    // 3. Decode, resize and classify off the async runtime
    let start = Instant::now();
    let prediction = classify_file(state, stored.path.clone()).await?;
    record_inference_duration(start.elapsed().as_secs_f64());

    tracing::info!(
        file = %stored.file_name,
        class = %prediction.class,
        confidence = prediction.confidence,
        "classified upload"
    );

    Ok(PredictResponse {
        status: "success",
        prediction,
        image_url: stored.url,
    })
}

async fn classify_file(
    state: &AppState,
    path: std::path::PathBuf,
) -> Result<Prediction, InferenceError> {
    let classifier = Arc::clone(&state.classifier);
    let labels = state.labels.clone();
    let size = state.image_size;

    tokio::task::spawn_blocking(move || {
        let input = load_and_preprocess(&path, size)?;
        let probabilities = classifier.predict(input)?;
        labels.classify(&probabilities)
    })
    .await
    .map_err(|e| InferenceError::TaskFailed(e.to_string()))?
}
