//! In-process ONNX inference.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::imaging::{ImageTensor, CHANNELS};
use crate::runtime::ProbabilityVector;

use super::{BackendKind, InferenceBackend};

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// A classifier exported to ONNX, loaded once and evaluated per request.
///
/// The optimized plan is immutable, so concurrent requests share it without
/// locking.
pub struct LocalOnnxBackend {
    plan: Arc<OnnxPlan>,
    input_size: u32,
    model_path: PathBuf,
}

impl LocalOnnxBackend {
    /// Load and optimize the model for a `[1, input_size, input_size, 3]`
    /// f32 input.
    pub fn load(model_path: &Path, input_size: u32) -> Result<Self> {
        if !model_path.is_file() {
            return Err(Error::ConfigError(format!(
                "Model file not found: {}",
                model_path.display()
            )));
        }
        if input_size == 0 {
            return Err(Error::ConfigError(
                "input_size must be greater than zero".to_string(),
            ));
        }

        let side = input_size as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(model_path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, side, side, CHANNELS]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| {
                Error::ConfigError(format!(
                    "Failed to load ONNX model {}: {:#}",
                    model_path.display(),
                    e
                ))
            })?;

        info!(
            "Loaded ONNX model {} ({}x{} input)",
            model_path.display(),
            input_size,
            input_size
        );

        Ok(Self {
            plan: Arc::new(plan),
            input_size,
            model_path: model_path.to_path_buf(),
        })
    }
}

#[async_trait]
impl InferenceBackend for LocalOnnxBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::LocalOnnx
    }

    fn input_size(&self) -> Option<u32> {
        Some(self.input_size)
    }

    fn target(&self) -> String {
        self.model_path.display().to_string()
    }

    async fn predict(&self, tensor: ImageTensor) -> Result<ProbabilityVector> {
        if tensor.height() != self.input_size || tensor.width() != self.input_size {
            return Err(Error::InferenceUnavailable(format!(
                "model expects {}x{} input, got {}x{}",
                self.input_size,
                self.input_size,
                tensor.width(),
                tensor.height()
            )));
        }

        let plan = self.plan.clone();
        let scores = tokio::task::spawn_blocking(move || run_plan(&plan, &tensor))
            .await
            .map_err(|e| Error::TaskFailed(format!("ONNX inference task failed: {}", e)))??;

        debug!("Local model produced {} scores", scores.len());
        Ok(ProbabilityVector::new(scores))
    }
}

fn run_plan(plan: &OnnxPlan, tensor: &ImageTensor) -> Result<Vec<f64>> {
    let input = Tensor::from_shape(&tensor.batch_shape(), tensor.data())
        .map_err(|e| Error::InferenceUnavailable(format!("Failed to build input tensor: {:#}", e)))?;

    let outputs = plan
        .run(tvec!(input.into()))
        .map_err(|e| Error::InferenceUnavailable(format!("Model evaluation failed: {:#}", e)))?;

    let first = outputs
        .first()
        .ok_or_else(|| Error::InferenceUnavailable("Model produced no outputs".to_string()))?;
    let view = first
        .to_array_view::<f32>()
        .map_err(|e| Error::InferenceUnavailable(format!("Unexpected output type: {:#}", e)))?;

    // Output is [1, classes]; flattening takes the single batch row.
    Ok(view.iter().map(|&v| f64::from(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn rejects_missing_model() {
        let err = LocalOnnxBackend::load(Path::new("/no/such/model.onnx"), 256)
            .err()
            .expect("missing file must fail");
        assert!(err.to_string().contains("Model file not found"));
    }

    // Minimal protobuf writer, enough to emit an ONNX ModelProto.
    fn varint(buf: &mut Vec<u8>, mut value: u64) {
        while value >= 0x80 {
            buf.push((value as u8) | 0x80);
            value >>= 7;
        }
        buf.push(value as u8);
    }

    fn int_field(buf: &mut Vec<u8>, field: u64, value: i64) {
        varint(buf, field << 3);
        varint(buf, value as u64);
    }

    fn bytes_field(buf: &mut Vec<u8>, field: u64, data: &[u8]) {
        varint(buf, (field << 3) | 2);
        varint(buf, data.len() as u64);
        buf.extend_from_slice(data);
    }

    fn float_value_info(name: &str, dims: &[i64]) -> Vec<u8> {
        let mut shape = Vec::new();
        for &dim in dims {
            let mut d = Vec::new();
            int_field(&mut d, 1, dim);
            bytes_field(&mut shape, 1, &d);
        }
        let mut tensor_type = Vec::new();
        int_field(&mut tensor_type, 1, 1); // FLOAT
        bytes_field(&mut tensor_type, 2, &shape);
        let mut type_proto = Vec::new();
        bytes_field(&mut type_proto, 1, &tensor_type);

        let mut info = Vec::new();
        bytes_field(&mut info, 1, name.as_bytes());
        bytes_field(&mut info, 2, &type_proto);
        info
    }

    /// `y[1, 3] = ReduceMean(x[1, 2, 2, 3], axes = [1, 2])`: one score per
    /// colour channel.
    fn channel_mean_model() -> Vec<u8> {
        let mut axes = Vec::new();
        bytes_field(&mut axes, 1, b"axes");
        int_field(&mut axes, 8, 1);
        int_field(&mut axes, 8, 2);
        int_field(&mut axes, 20, 7); // INTS

        let mut keepdims = Vec::new();
        bytes_field(&mut keepdims, 1, b"keepdims");
        int_field(&mut keepdims, 3, 0);
        int_field(&mut keepdims, 20, 2); // INT

        let mut node = Vec::new();
        bytes_field(&mut node, 1, b"x");
        bytes_field(&mut node, 2, b"y");
        bytes_field(&mut node, 3, b"channel_mean");
        bytes_field(&mut node, 4, b"ReduceMean");
        bytes_field(&mut node, 5, &axes);
        bytes_field(&mut node, 5, &keepdims);

        let mut graph = Vec::new();
        bytes_field(&mut graph, 1, &node);
        bytes_field(&mut graph, 2, b"leaf_channels");
        bytes_field(&mut graph, 11, &float_value_info("x", &[1, 2, 2, 3]));
        bytes_field(&mut graph, 12, &float_value_info("y", &[1, 3]));

        let mut opset = Vec::new();
        int_field(&mut opset, 2, 13);

        let mut model = Vec::new();
        int_field(&mut model, 1, 8);
        bytes_field(&mut model, 7, &graph);
        bytes_field(&mut model, 8, &opset);
        model
    }

    fn write_model() -> PathBuf {
        let path = std::env::temp_dir().join(format!("leafcheck-mean-{}.onnx", Uuid::new_v4()));
        std::fs::write(&path, channel_mean_model()).unwrap();
        path
    }

    #[tokio::test]
    async fn runs_model_on_batched_hwc_input() {
        let path = write_model();
        let backend = LocalOnnxBackend::load(&path, 2).unwrap();
        assert_eq!(backend.input_size(), Some(2));
        assert_eq!(backend.target(), path.display().to_string());

        // Four pixels, each [r, g, b]
        let tensor = ImageTensor::from_raw(
            2,
            2,
            vec![
                0.0, 10.0, 100.0, //
                2.0, 20.0, 200.0, //
                4.0, 30.0, 300.0, //
                6.0, 40.0, 400.0,
            ],
        )
        .unwrap();

        let scores = backend.predict(tensor).await.unwrap();
        assert_eq!(scores.len(), 3);
        let expected = [3.0, 25.0, 250.0];
        for (got, want) in scores.as_slice().iter().zip(expected) {
            assert!((got - want).abs() < 1e-4, "got {got}, want {want}");
        }

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn wrong_input_size_is_unavailable() {
        let path = write_model();
        let backend = LocalOnnxBackend::load(&path, 2).unwrap();

        let tensor = ImageTensor::from_raw(3, 3, vec![0.0; 3 * 3 * CHANNELS]).unwrap();
        let err = backend.predict(tensor).await.unwrap_err();
        assert!(matches!(err, Error::InferenceUnavailable(_)));
        assert!(err.to_string().contains("2x2"));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn rejects_corrupt_model() {
        let path = std::env::temp_dir().join(format!("leafcheck-corrupt-{}.onnx", Uuid::new_v4()));
        std::fs::write(&path, b"not an onnx protobuf").unwrap();

        let err = LocalOnnxBackend::load(&path, 256)
            .err()
            .expect("corrupt model must fail");
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("Failed to load ONNX model"));

        let _ = std::fs::remove_file(&path);
    }
}
