//! TensorFlow-Serving REST client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::imaging::{ImageTensor, CHANNELS};
use crate::runtime::ProbabilityVector;

use super::{BackendKind, InferenceBackend};

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<Vec<Vec<[f32; CHANNELS]>>>,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Vec<f64>>,
}

/// Forwards each image, as a batch of one, to a model-serving endpoint.
pub struct RemoteServingBackend {
    client: reqwest::Client,
    endpoint: String,
    input_size: Option<u32>,
}

impl RemoteServingBackend {
    pub fn new(endpoint: String, timeout: Duration, input_size: Option<u32>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint,
            input_size,
        })
    }
}

#[async_trait]
impl InferenceBackend for RemoteServingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::RemoteServing
    }

    fn input_size(&self) -> Option<u32> {
        self.input_size
    }

    fn target(&self) -> String {
        self.endpoint.clone()
    }

    async fn predict(&self, tensor: ImageTensor) -> Result<ProbabilityVector> {
        let payload = PredictRequest {
            instances: vec![tensor.to_nested()],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                Error::InferenceUnavailable(format!(
                    "request to {} failed: {}",
                    self.endpoint, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::InferenceUnavailable(format!(
                "HTTP {} from {}: {}",
                status,
                self.endpoint,
                body.trim()
            )));
        }

        let body: PredictResponse = response.json().await.map_err(|e| {
            Error::InferenceUnavailable(format!("malformed prediction response: {}", e))
        })?;

        let scores = body
            .predictions
            .into_iter()
            .next()
            .filter(|row| !row.is_empty())
            .ok_or_else(|| {
                Error::InferenceUnavailable("prediction response has no scores".to_string())
            })?;

        debug!("Remote backend returned {} scores", scores.len());
        Ok(ProbabilityVector::new(scores))
    }
}
