//! Turns a probability vector into a [`PredictionResult`].

use crate::catalog::ClassLabels;
use crate::error::{Error, Result};
use crate::metadata::MetadataStore;

use super::types::{PredictionResult, ProbabilityVector};

/// Pick the top class, read its confidence and attach its metadata.
///
/// The vector must be aligned with `labels`; a length mismatch means the
/// backend answered for a different model and is reported as unavailable.
pub fn compose(
    probabilities: &ProbabilityVector,
    labels: &ClassLabels,
    metadata: &MetadataStore,
    language: &str,
) -> Result<PredictionResult> {
    if probabilities.len() != labels.len() {
        return Err(Error::InferenceUnavailable(format!(
            "backend returned {} scores for {} classes",
            probabilities.len(),
            labels.len()
        )));
    }

    let (index, confidence) = probabilities.argmax().ok_or_else(|| {
        Error::InferenceUnavailable("backend returned no comparable scores".to_string())
    })?;
    let class = labels
        .get(index)
        .ok_or_else(|| Error::InferenceUnavailable(format!("no class at index {}", index)))?;

    let details = metadata
        .is_enabled()
        .then(|| metadata.resolve(class, language));

    Ok(PredictionResult {
        class: class.to_string(),
        confidence,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DiseaseRecord;

    fn scores(values: &[f64]) -> ProbabilityVector {
        ProbabilityVector::new(values.to_vec())
    }

    #[test]
    fn picks_tomato_bacterial_spot() {
        let result = compose(
            &scores(&[0.05, 0.02, 0.10, 0.03, 0.70, 0.05, 0.05]),
            &ClassLabels::default(),
            &MetadataStore::builtin("en"),
            "en",
        )
        .unwrap();

        assert_eq!(result.class, "Tomato_Bacterial_spot");
        assert_eq!(result.confidence, 0.70);
        let details = result.details.unwrap();
        assert_eq!(details.cause[0], "Xanthomonas species");
        assert_eq!(details.cure.len(), 3);
    }

    #[test]
    fn ties_resolve_to_first_class() {
        let result = compose(
            &scores(&[0.3, 0.3, 0.1, 0.1, 0.1, 0.05, 0.05]),
            &ClassLabels::default(),
            &MetadataStore::disabled("en"),
            "en",
        )
        .unwrap();

        assert_eq!(result.class, "Pepper__bell___Bacterial_spot");
        assert_eq!(result.confidence, 0.3);
        assert!(result.details.is_none());
    }

    #[test]
    fn class_without_metadata_gets_empty_lists() {
        let result = compose(
            &scores(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
            &ClassLabels::default(),
            &MetadataStore::builtin("en"),
            "fr",
        )
        .unwrap();

        assert_eq!(result.class, "Tomato_healthy");
        assert_eq!(result.details, Some(DiseaseRecord::default()));
    }

    #[test]
    fn class_and_confidence_follow_argmax_for_every_position() {
        let labels = ClassLabels::default();
        let store = MetadataStore::disabled("en");
        for winner in 0..labels.len() {
            let mut values = vec![0.1; labels.len()];
            values[winner] = 0.4;
            let result = compose(&scores(&values), &labels, &store, "en").unwrap();
            assert_eq!(result.class, labels.get(winner).unwrap());
            assert_eq!(result.confidence, 0.4);
        }
    }

    #[test]
    fn length_mismatch_is_unavailable() {
        let err = compose(
            &scores(&[0.5, 0.5]),
            &ClassLabels::default(),
            &MetadataStore::disabled("en"),
            "en",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InferenceUnavailable(_)));
    }

    #[test]
    fn all_nan_is_unavailable() {
        let labels = ClassLabels::new(["a", "b"]).unwrap();
        let err = compose(
            &scores(&[f64::NAN, f64::NAN]),
            &labels,
            &MetadataStore::disabled("en"),
            "en",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InferenceUnavailable(_)));
    }
}
