use crate::error::InferenceError;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;

// Initialize the global environment for ORT (only needed once)
pub fn init_ort() -> Result<(), InferenceError> {
    ort::init().with_name("wheat-detect").commit()?;
    Ok(())
}

/// Loads the classifier graph from disk and creates an inference session.
///
/// Fails with [`InferenceError::ModelNotFound`] before touching ORT when the
/// file is absent, so a missing artifact stops startup with a clear message.
///
/// # Arguments
/// * `model_path` - Path to the .onnx file
/// * `intra_threads` - Parallelism within a single operator
pub fn load_model(
    model_path: impl AsRef<Path>,
    intra_threads: usize,
) -> Result<Session, InferenceError> {
    let path = model_path.as_ref();
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.display().to_string()));
    }

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(path)?;

    tracing::info!(path = %path.display(), "loaded classifier");
    for (i, input) in session.inputs.iter().enumerate() {
        tracing::debug!(index = i, name = %input.name, kind = ?input.input_type, "model input");
    }
    for (i, output) in session.outputs.iter().enumerate() {
        tracing::debug!(index = i, name = %output.name, kind = ?output.output_type, "model output");
    }

    Ok(session)
}
