//! Classifier configuration.
//!
//! Settings can come from explicit values, a JSON file, or `PERCEPT_*`
//! environment variables. Whatever the source, the configuration is
//! validated eagerly before any component is constructed.

use crate::core::constants::{
    DEFAULT_INPUT_HEIGHT, DEFAULT_INPUT_WIDTH, DEFAULT_TOP_K,
};
use crate::core::errors::ClassifierError;
use crate::core::factory::{DecoderKind, EngineKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Construction-time configuration for the classification pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Path to the ONNX model artifact.
    pub model_path: PathBuf,
    /// Path to the label file (one class name per line, line order = output index).
    pub label_path: PathBuf,
    /// Target model input height in pixels.
    pub input_height: u32,
    /// Target model input width in pixels.
    pub input_width: u32,
    /// Default number of ranked predictions to return.
    pub top_k: usize,
    /// Hint for the inference runtime's intra-op thread count.
    pub intra_threads: Option<usize>,
    /// Which image decoder implementation to construct.
    pub decoder: DecoderKind,
    /// Which inference engine implementation to construct.
    pub engine: EngineKind,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("resnet50.onnx"),
            label_path: PathBuf::from("imagenet_classes.txt"),
            input_height: DEFAULT_INPUT_HEIGHT,
            input_width: DEFAULT_INPUT_WIDTH,
            top_k: DEFAULT_TOP_K,
            intra_threads: None,
            decoder: DecoderKind::default(),
            engine: EngineKind::default(),
        }
    }
}

impl ClassifierConfig {
    /// Creates a configuration with the given model and label paths and
    /// defaults for everything else.
    pub fn new(model_path: impl Into<PathBuf>, label_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            label_path: label_path.into(),
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ClassifierError> {
        let content = std::fs::read_to_string(path).map_err(|e| ClassifierError::Config {
            message: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        serde_json::from_str(&content).map_err(|e| ClassifierError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })
    }

    /// Builds a configuration from `PERCEPT_*` environment variables.
    ///
    /// Unset variables keep their default values. Recognized variables:
    /// `PERCEPT_MODEL_PATH`, `PERCEPT_LABEL_PATH`, `PERCEPT_INPUT_HEIGHT`,
    /// `PERCEPT_INPUT_WIDTH`, `PERCEPT_TOP_K`, `PERCEPT_INTRA_THREADS`,
    /// `PERCEPT_DECODER`, `PERCEPT_ENGINE`.
    pub fn from_env() -> Result<Self, ClassifierError> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("PERCEPT_MODEL_PATH") {
            config.model_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("PERCEPT_LABEL_PATH") {
            config.label_path = PathBuf::from(v);
        }
        if let Some(v) = env_parse::<u32>("PERCEPT_INPUT_HEIGHT")? {
            config.input_height = v;
        }
        if let Some(v) = env_parse::<u32>("PERCEPT_INPUT_WIDTH")? {
            config.input_width = v;
        }
        if let Some(v) = env_parse::<usize>("PERCEPT_TOP_K")? {
            config.top_k = v;
        }
        if let Some(v) = env_parse::<usize>("PERCEPT_INTRA_THREADS")? {
            config.intra_threads = Some(v);
        }
        if let Ok(v) = std::env::var("PERCEPT_DECODER") {
            config.decoder = v.parse()?;
        }
        if let Ok(v) = std::env::var("PERCEPT_ENGINE") {
            config.engine = v.parse()?;
        }

        Ok(config)
    }

    /// Validates the configuration before any component is built.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the input dimensions are zero or the
    /// model/label files do not exist.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.input_height == 0 || self.input_width == 0 {
            return Err(ClassifierError::Config {
                message: format!(
                    "input dimensions must be non-zero, got {}x{}",
                    self.input_width, self.input_height
                ),
            });
        }

        if !self.model_path.is_file() {
            return Err(ClassifierError::Config {
                message: format!("model file '{}' does not exist", self.model_path.display()),
            });
        }

        if !self.label_path.is_file() {
            return Err(ClassifierError::Config {
                message: format!("label file '{}' does not exist", self.label_path.display()),
            });
        }

        if let Some(threads) = self.intra_threads {
            if threads == 0 {
                return Err(ClassifierError::Config {
                    message: "intra_threads must be at least 1 when set".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Reads and parses an environment variable, reporting the variable name on failure.
fn env_parse<T: std::str::FromStr>(name: &str) -> Result<Option<T>, ClassifierError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|e| ClassifierError::Config {
            message: format!("invalid value '{raw}' for {name}: {e}"),
        }),
        Err(_) => Ok(None),
    }
}
