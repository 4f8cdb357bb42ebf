use crate::error::InferenceError;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Ordered class names; position `i` names output `i` of the classifier.
#[derive(Clone, Debug)]
pub struct ClassLabels(Arc<[String]>);

impl ClassLabels {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        Self(names.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Turns a probability vector into the top class and the full
    /// distribution.
    ///
    /// The distribution pairs labels and probabilities positionally and stops
    /// at whichever runs out first. The top class is the first maximum; if it
    /// falls past the last label the whole prediction fails. A NaN or infinite
    /// probability anywhere also fails it.
    pub fn classify(&self, probabilities: &[f32]) -> Result<Prediction, InferenceError> {
        if let Some(index) = probabilities.iter().position(|p| !p.is_finite()) {
            return Err(InferenceError::NonFiniteOutput { index });
        }
        let (index, confidence) = argmax(probabilities).ok_or(InferenceError::EmptyOutput)?;
        let class = self
            .get(index)
            .ok_or(InferenceError::LabelOutOfRange {
                index,
                labels: self.len(),
            })?
            .to_string();

        let all_predictions = self
            .iter()
            .zip(probabilities)
            .map(|(label, &p)| (label.to_string(), p))
            .collect();

        Ok(Prediction {
            class,
            confidence,
            all_predictions,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class: String,
    pub confidence: f32,
    pub all_predictions: IndexMap<String, f32>,
}

// First index holding the largest value. Callers reject non-finite input first.
fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut iter = values.iter().copied().enumerate();
    let first = iter.next()?;
    Some(iter.fold(first, |best, (i, v)| if v > best.1 { (i, v) } else { best }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> ClassLabels {
        ClassLabels::new(
            ["Healthy", "Disease1", "Disease2", "Disease3"]
                .into_iter()
                .map(String::from),
        )
    }

    #[test]
    fn test_classify_picks_highest_probability() {
        let prediction = labels().classify(&[0.1, 0.2, 0.6, 0.1]).unwrap();

        assert_eq!(prediction.class, "Disease2");
        assert_eq!(prediction.confidence, 0.6);
        assert_eq!(prediction.all_predictions.len(), 4);
        assert_eq!(prediction.all_predictions["Healthy"], 0.1);
        assert_eq!(prediction.all_predictions["Disease2"], 0.6);
    }

    #[test]
    fn test_confidence_is_max_of_distribution() {
        let prediction = labels().classify(&[0.05, 0.15, 0.3, 0.5]).unwrap();
        let max = prediction
            .all_predictions
            .values()
            .copied()
            .fold(f32::MIN, f32::max);

        assert_eq!(prediction.confidence, max);
        assert_eq!(prediction.all_predictions[&prediction.class], max);
    }

    #[test]
    fn test_distribution_keeps_label_order() {
        let prediction = labels().classify(&[0.4, 0.3, 0.2, 0.1]).unwrap();
        let keys: Vec<&str> = prediction.all_predictions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Healthy", "Disease1", "Disease2", "Disease3"]);
    }

    #[test]
    fn test_ties_resolve_to_first_index() {
        let prediction = labels().classify(&[0.4, 0.4, 0.1, 0.1]).unwrap();
        assert_eq!(prediction.class, "Healthy");
    }

    #[test]
    fn test_empty_output_is_an_error() {
        assert!(matches!(
            labels().classify(&[]),
            Err(InferenceError::EmptyOutput)
        ));
    }

    #[test]
    fn test_shorter_output_truncates_distribution() {
        let prediction = labels().classify(&[0.3, 0.7]).unwrap();
        assert_eq!(prediction.class, "Disease1");
        assert_eq!(prediction.all_predictions.len(), 2);
    }

    #[test]
    fn test_argmax_past_last_label_is_an_error() {
        let result = labels().classify(&[0.1, 0.1, 0.1, 0.1, 0.6]);
        match result {
            Err(InferenceError::LabelOutOfRange { index, labels }) => {
                assert_eq!(index, 4);
                assert_eq!(labels, 4);
            }
            other => panic!("Expected LabelOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_in_first_position_is_an_error() {
        match labels().classify(&[f32::NAN, 0.9, 0.05, 0.05]) {
            Err(InferenceError::NonFiniteOutput { index }) => assert_eq!(index, 0),
            other => panic!("Expected NonFiniteOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_nan_in_later_position_is_an_error() {
        match labels().classify(&[0.5, 0.3, f32::NAN, 0.2]) {
            Err(InferenceError::NonFiniteOutput { index }) => assert_eq!(index, 2),
            other => panic!("Expected NonFiniteOutput, got {other:?}"),
        }
    }

    #[test]
    fn test_infinite_probability_is_an_error() {
        assert!(matches!(
            labels().classify(&[0.1, f32::INFINITY, 0.1, 0.1]),
            Err(InferenceError::NonFiniteOutput { index: 1 })
        ));
    }

    #[test]
    fn test_prediction_serializes_with_class_key() {
        let prediction = labels().classify(&[0.25, 0.25, 0.25, 0.25]).unwrap();
        let value = serde_json::to_value(&prediction).unwrap();
        assert_eq!(value["class"], "Healthy");
        assert!(value["all_predictions"].is_object());
        assert!(value["confidence"].is_number());
    }
}
