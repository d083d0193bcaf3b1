//! Prediction service orchestrator.

use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::backends::{build_backend, BackendKind, InferenceBackend};
use crate::catalog::ClassLabels;
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::imaging::ImageDecoder;
use crate::metadata::MetadataStore;

use super::composer::compose;
use super::types::PredictionResult;

/// Everything a request needs, built once at startup and read-only after.
pub struct PredictionService {
    labels: ClassLabels,
    decoder: ImageDecoder,
    backend: Arc<dyn InferenceBackend>,
    metadata: MetadataStore,
}

impl PredictionService {
    pub fn new(
        labels: ClassLabels,
        backend: Arc<dyn InferenceBackend>,
        metadata: MetadataStore,
    ) -> Self {
        let decoder = ImageDecoder::for_input_size(backend.input_size());
        Self {
            labels,
            decoder,
            backend,
            metadata,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let labels = ClassLabels::new(config.class_labels.iter().cloned())?;
        let backend = build_backend(&config.backend)?;
        let metadata = MetadataStore::from_config(&config.metadata)?;
        Ok(Self::new(labels, backend, metadata))
    }

    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn backend_target(&self) -> String {
        self.backend.target()
    }

    /// Classify one uploaded image and enrich the result for `language`.
    pub async fn predict(&self, image: Vec<u8>, language: &str) -> Result<PredictionResult> {
        let started = Instant::now();

        let decoder = self.decoder;
        let tensor = tokio::task::spawn_blocking(move || decoder.decode(&image))
            .await
            .map_err(|e| Error::TaskFailed(format!("image decode task failed: {}", e)))??;

        let probabilities = self.backend.predict(tensor).await?;
        let result = compose(&probabilities, &self.labels, &self.metadata, language)?;

        debug!(
            "Predicted {} ({:.4}) in {:.1}ms",
            result.class,
            result.confidence,
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(result)
    }
}
