//! leafcheck core - plant-leaf disease classification
//!
//! This crate holds everything behind the HTTP surface:
//!
//! - [`imaging`]: upload bytes to RGB tensors
//! - [`backends`]: in-process ONNX or remote TF-Serving inference
//! - [`metadata`]: localized cause/precaution/cure tables
//! - [`runtime`]: argmax + metadata composition and the request pipeline
//!
//! # Example
//!
//! ```ignore
//! use leafcheck_core::{PredictionService, ServiceConfig};
//!
//! let service = PredictionService::from_config(&ServiceConfig::default())?;
//! let result = service.predict(std::fs::read("leaf.jpg")?, "en").await?;
//! println!("{} ({:.2})", result.class, result.confidence);
//! ```

pub mod backends;
pub mod catalog;
pub mod config;
pub mod error;
pub mod imaging;
pub mod metadata;
pub mod runtime;

pub use backends::{build_backend, BackendKind, InferenceBackend};
pub use catalog::{ClassLabels, DEFAULT_CLASS_NAMES};
pub use config::{BackendConfig, MetadataConfig, MetadataSource, ServerConfig, ServiceConfig};
pub use error::{Error, Result};
pub use imaging::{ImageDecoder, ImageTensor};
pub use metadata::{DiseaseRecord, MetadataStore};
pub use runtime::{compose, PredictionResult, PredictionService, ProbabilityVector};
