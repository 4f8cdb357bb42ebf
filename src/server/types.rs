use crate::model::{classifier::Classifier, labels::ClassLabels, labels::Prediction};
use crate::storage::UploadStore;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
    pub labels: ClassLabels,
    pub store: UploadStore,
    pub image_size: u32,
    pub metrics: PrometheusHandle,
}

// --- DTOs (Data Transfer Objects) ---

#[derive(Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub status: &'static str,
    pub prediction: Prediction,
    pub image_url: String,
}
