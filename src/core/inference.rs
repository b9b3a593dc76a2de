//! ONNX Runtime inference engine.
//!
//! Wraps a loaded model artifact behind a small pool of sessions so that
//! concurrent callers never share a session mutably. Each call picks a
//! session round-robin and holds its lock for exactly the forward pass.

use crate::core::config::ClassifierConfig;
use crate::core::errors::{ClassifierError, SimpleError};
use crate::core::{Tensor2D, Tensor4D};
use ndarray::ArrayView2;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::value::{TensorRef, ValueType};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Description of the loaded model's single input and single output tensor.
///
/// Derived from the session metadata at load time; dynamic dimensions are
/// reported as -1.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDetails {
    /// Name of the model's input tensor.
    pub input_name: String,
    /// Declared shape of the input tensor.
    pub input_shape: Vec<i64>,
    /// Name of the model's output tensor.
    pub output_name: String,
}

/// ONNX Runtime engine for single-image classification models.
pub struct OrtEngine {
    sessions: Vec<Mutex<Session>>,
    next_idx: AtomicUsize,
    details: ModelDetails,
    output_shape: Vec<i64>,
    model_path: PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OrtEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtEngine")
            .field("sessions", &self.sessions.len())
            .field("details", &self.details)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtEngine {
    /// Creates an engine with a single session and default runtime settings.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the model file is missing or cannot be
    /// loaded as an ONNX artifact. Failures happen here, eagerly, so a bad
    /// artifact never reaches the request path.
    pub fn new(
        model_path: impl AsRef<Path>,
        intra_threads: Option<usize>,
    ) -> Result<Self, ClassifierError> {
        Self::with_pool(model_path, intra_threads, 1)
    }

    /// Creates an engine from the classifier settings object.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        Self::with_pool(&config.model_path, config.intra_threads, 1)
    }

    /// Creates an engine with a pool of `pool_size` sessions for concurrent
    /// predictions.
    pub fn with_pool(
        model_path: impl AsRef<Path>,
        intra_threads: Option<usize>,
        pool_size: usize,
    ) -> Result<Self, ClassifierError> {
        let path = model_path.as_ref();

        if !path.is_file() {
            return Err(ClassifierError::Config {
                message: format!("model file '{}' does not exist", path.display()),
            });
        }

        let pool_size = pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let mut builder = Session::builder()?.with_log_level(LogLevel::Error)?;
            if let Some(threads) = intra_threads {
                builder = builder.with_intra_threads(threads)?;
            }
            let session = builder.commit_from_file(path).map_err(|e| {
                ClassifierError::model_load_error(path, "failed to create ONNX session", e)
            })?;
            sessions.push(Mutex::new(session));
        }

        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();

        let (details, output_shape) = Self::read_metadata(&sessions[0], path)?;

        tracing::debug!(
            model = %model_name,
            input = %details.input_name,
            output = %details.output_name,
            input_shape = ?details.input_shape,
            "ONNX session ready"
        );

        Ok(Self {
            sessions,
            next_idx: AtomicUsize::new(0),
            details,
            output_shape,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn read_metadata(
        session: &Mutex<Session>,
        path: &Path,
    ) -> Result<(ModelDetails, Vec<i64>), ClassifierError> {
        let guard = session.lock().map_err(|_| ClassifierError::Config {
            message: "failed to acquire session lock while reading model metadata".to_string(),
        })?;

        let input = guard.inputs.first().ok_or_else(|| ClassifierError::Config {
            message: format!("model '{}' declares no inputs", path.display()),
        })?;
        let output = guard.outputs.first().ok_or_else(|| ClassifierError::Config {
            message: format!("model '{}' declares no outputs", path.display()),
        })?;

        let input_shape = match &input.input_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect(),
            other => {
                return Err(ClassifierError::Config {
                    message: format!(
                        "model '{}' input '{}' is not a tensor: {:?}",
                        path.display(),
                        input.name,
                        other
                    ),
                })
            }
        };

        let output_shape = match &output.output_type {
            ValueType::Tensor { shape, .. } => shape.iter().copied().collect(),
            _ => Vec::new(),
        };

        let details = ModelDetails {
            input_name: input.name.clone(),
            input_shape,
            output_name: output.name.clone(),
        };

        Ok((details, output_shape))
    }

    /// Returns the model's input/output tensor description.
    ///
    /// Cached at load time; the loaded artifact never changes underneath it.
    pub fn details(&self) -> ModelDetails {
        self.details.clone()
    }

    /// Returns the model path associated with this engine.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Returns the model name associated with this engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Number of output classes, when the model declares a static output width.
    pub fn output_classes(&self) -> Option<usize> {
        match self.output_shape.last() {
            Some(&dim) if dim > 0 => Some(dim as usize),
            _ => None,
        }
    }

    /// Validates the input tensor against the model's declared shape.
    ///
    /// Dynamic dimensions (-1) accept any size; static dimensions must match
    /// exactly. A mismatch fails before the tensor is bound, with the
    /// offending dimension named in the error.
    fn validate_input_shape(&self, x: &Tensor4D) -> Result<(), ClassifierError> {
        let declared = &self.details.input_shape;
        let actual = x.shape();

        if declared.len() != actual.len() {
            return Err(ClassifierError::inference_error(
                &self.model_name,
                "input_validation",
                format!(
                    "model expects a rank-{} input tensor, got rank {} with shape {:?}",
                    declared.len(),
                    actual.len(),
                    actual
                ),
                SimpleError::new("input rank mismatch"),
            ));
        }

        for (dim, (&want, &got)) in declared.iter().zip(actual).enumerate() {
            if want > 0 && want as usize != got {
                return Err(ClassifierError::inference_error(
                    &self.model_name,
                    "input_validation",
                    format!(
                        "input dimension {dim} is {got} but the model expects {want} (declared shape {declared:?}, got {actual:?})"
                    ),
                    SimpleError::new("input shape mismatch"),
                ));
            }
        }

        Ok(())
    }

    /// Executes a forward pass and returns the raw score tensor.
    ///
    /// The input is bound to the model's input name and the output read from
    /// its output name, both discovered at load time. Given identical weights
    /// and identical input bytes the output is reproducible: execution stays
    /// on the CPU provider and no randomness is involved.
    ///
    /// # Errors
    ///
    /// Returns an `Inference` error if the input shape does not match the
    /// model contract, the forward pass fails, or the output is not a 2D
    /// f32 tensor of the declared size.
    pub fn run(&self, x: &Tensor4D) -> Result<Tensor2D, ClassifierError> {
        self.validate_input_shape(x)?;

        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            ClassifierError::inference_error(
                &self.model_name,
                "tensor_conversion",
                format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let inputs = ort::inputs![self.details.input_name.as_str() => input_tensor];

        let idx = self.next_idx.fetch_add(1, Ordering::Relaxed) % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            ClassifierError::inference_error(
                &self.model_name,
                "session_lock",
                format!("failed to acquire session lock {}/{}", idx, self.sessions.len()),
                SimpleError::new("session lock acquisition failed"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            ClassifierError::inference_error(
                &self.model_name,
                "forward_pass",
                format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.details.input_name, self.details.output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[self.details.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                ClassifierError::inference_error(
                    &self.model_name,
                    "output_extraction",
                    format!(
                        "failed to extract output tensor '{}' as f32",
                        self.details.output_name
                    ),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(ClassifierError::inference_error(
                &self.model_name,
                "output_validation",
                format!(
                    "expected a 2D score tensor, got {}D with shape {:?}",
                    output_shape.len(),
                    output_shape
                ),
                SimpleError::new("invalid output tensor dimensions"),
            ));
        }

        let batch = output_shape[0] as usize;
        let classes = output_shape[1] as usize;

        if output_data.len() != batch * classes {
            return Err(ClassifierError::inference_error(
                &self.model_name,
                "output_validation",
                format!(
                    "output data size mismatch: expected {}, got {}",
                    batch * classes,
                    output_data.len()
                ),
                SimpleError::new("output tensor data size mismatch"),
            ));
        }

        let scores = ArrayView2::from_shape((batch, classes), output_data)
            .map_err(ClassifierError::Tensor)?;
        Ok(scores.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_model_is_config_error() {
        let result = OrtEngine::new("/nonexistent/model.onnx", None);
        match result {
            Err(ClassifierError::Config { message }) => {
                assert!(message.contains("does not exist"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupted_model_is_captured_not_a_panic() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not an onnx protobuf").unwrap();

        let result = OrtEngine::new(file.path(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_pool_rejects_missing_model() {
        let result = OrtEngine::with_pool("/nonexistent/model.onnx", None, 4);
        assert!(matches!(result, Err(ClassifierError::Config { .. })));
    }
}
