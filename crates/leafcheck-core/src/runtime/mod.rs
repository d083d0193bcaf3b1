//! Prediction pipeline: decode, infer, compose.

mod composer;
mod service;
mod types;

pub use composer::compose;
pub use service::PredictionService;
pub use types::{PredictionResult, ProbabilityVector};
