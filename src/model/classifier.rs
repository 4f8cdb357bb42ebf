use crate::error::InferenceError;
use ndarray::{Array4, ArrayViewD, Axis};
use ort::{session::Session, value::Tensor};
use std::sync::Mutex;

/// A model that maps a normalized `[1, H, W, 3]` image batch to one
/// probability per class.
pub trait Classifier: Send + Sync {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

/// [`Classifier`] backed by an ONNX Runtime session.
///
/// `Session::run` needs exclusive access, so concurrent requests take turns
/// on the mutex.
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| InferenceError::SessionPoisoned(e.to_string()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| InferenceError::PreprocessingError("model declares no inputs".into()))?;
        if session.outputs.is_empty() {
            return Err(InferenceError::EmptyOutput);
        }

        let input = input.as_standard_layout().into_owned();
        let shape = input.shape().to_vec();
        let (data, _) = input.into_raw_vec_and_offset();
        let input_value = Tensor::from_array((shape, data.into_boxed_slice()))?;
        let outputs = session.run(ort::inputs![input_name => input_value])?;

        let (shape, data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: Vec<usize> = shape.iter().map(|&x| x as usize).collect();
        let probabilities = first_row(ArrayViewD::from_shape(dims.as_slice(), data)?)?;

        Ok(probabilities)
    }
}

/// Probabilities for the single image in the batch.
fn first_row(output: ArrayViewD<'_, f32>) -> Result<Vec<f32>, InferenceError> {
    if output.ndim() == 0 || output.len_of(Axis(0)) == 0 {
        return Err(InferenceError::EmptyOutput);
    }
    let row: Vec<f32> = output.index_axis(Axis(0), 0).iter().copied().collect();
    if row.is_empty() {
        return Err(InferenceError::EmptyOutput);
    }
    Ok(row)
}
