//! Inference backends.
//!
//! The request path only sees [`InferenceBackend`]; which implementation sits
//! behind it is decided once, at startup, from [`BackendConfig`].

mod local;
mod remote;

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::BackendConfig;
use crate::error::Result;
use crate::imaging::ImageTensor;
use crate::runtime::ProbabilityVector;

pub use local::LocalOnnxBackend;
pub use remote::RemoteServingBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    LocalOnnx,
    RemoteServing,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::LocalOnnx => "local_onnx",
            BackendKind::RemoteServing => "remote_serving",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tensor in, probability vector out.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Square input resolution the backend needs, if it needs a fixed one.
    fn input_size(&self) -> Option<u32>;

    /// Human-readable target (model path or endpoint URL) for logs and
    /// health output.
    fn target(&self) -> String;

    async fn predict(&self, tensor: ImageTensor) -> Result<ProbabilityVector>;
}

/// Construct the backend described by `config`.
pub fn build_backend(config: &BackendConfig) -> Result<Arc<dyn InferenceBackend>> {
    let backend: Arc<dyn InferenceBackend> = match config {
        BackendConfig::Local {
            model_path,
            input_size,
        } => Arc::new(LocalOnnxBackend::load(model_path, *input_size)?),
        BackendConfig::Remote {
            endpoint,
            timeout_secs,
            input_size,
        } => Arc::new(RemoteServingBackend::new(
            endpoint.clone(),
            Duration::from_secs(*timeout_secs),
            *input_size,
        )?),
    };

    info!(
        "Inference backend: {} ({})",
        backend.kind(),
        backend.target()
    );
    Ok(backend)
}
