//! Error types for the classification pipeline.
//!
//! This module defines the errors that can occur while decoding images,
//! loading models and labels, and running inference, together with helper
//! constructors for creating them with useful context.

use std::path::Path;
use thiserror::Error;

/// Convenient result alias for pipeline operations.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Errors produced by the classification pipeline.
///
/// The taxonomy follows how errors are surfaced to callers:
/// configuration problems are fatal at construction/load time, decode and
/// inference problems are scoped to a single request. None of them are
/// retried automatically.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The input bytes or file were not a valid, recognized image encoding.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// The caller handed the pipeline something it cannot work with.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Unsupported loader tag, bad path, label/output mismatch or any other
    /// problem detected at construction time.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// The forward pass failed or its tensors did not match the model contract.
    #[error("inference failed for model '{model_name}' during {operation}: {context}")]
    Inference {
        /// Name of the model the failure belongs to.
        model_name: String,
        /// Operation that failed (tensor conversion, forward pass, extraction).
        operation: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor shape operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifierError {
    /// Creates a configuration error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error from a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error for a model artifact that failed to load.
    ///
    /// Loading failures are configuration errors: a corrupt or missing model
    /// file will not succeed on retry, and the surrounding service should
    /// report itself not-ready rather than crash.
    pub fn model_load_error(
        path: &Path,
        context: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: format!("{} for model at '{}': {}", context, path.display(), source),
        }
    }

    /// Creates an inference error with model and operation context.
    pub fn inference_error(
        model_name: impl Into<String>,
        operation: impl Into<String>,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.into(),
            operation: operation.into(),
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// A minimal string-backed error for failures with no richer source.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new simple error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}
