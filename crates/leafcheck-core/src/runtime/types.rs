//! Runtime request/response types.

use serde::Serialize;

use crate::metadata::DiseaseRecord;

/// Per-class scores as produced by an inference backend, aligned with the
/// class label enumeration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbabilityVector(Vec<f64>);

impl ProbabilityVector {
    pub fn new(scores: Vec<f64>) -> Self {
        Self(scores)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index and value of the highest score. Ties go to the lowest index;
    /// NaN scores never win.
    pub fn argmax(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &score) in self.0.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((idx, score)),
            }
        }
        best
    }
}

impl From<Vec<f64>> for ProbabilityVector {
    fn from(scores: Vec<f64>) -> Self {
        Self(scores)
    }
}

/// Final answer for one uploaded image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub class: String,
    pub confidence: f64,
    /// Absent when the service runs without a metadata source.
    #[serde(flatten)]
    pub details: Option<DiseaseRecord>,
}
