//! Single-image classifier.
//!
//! Ties the pipeline together: decode -> resize -> normalize -> timed
//! forward pass -> softmax -> ranked top-k. The pipeline is pure for a
//! fixed image and fixed model weights/labels: running it twice yields the
//! same predictions in the same order.

use crate::core::config::ClassifierConfig;
use crate::core::decoder::ImageDecoder;
use crate::core::errors::ClassifierError;
use crate::core::factory::{create_decoder, create_engine, DecoderKind, EngineKind};
use crate::core::inference::{ModelDetails, OrtEngine};
use crate::core::labels::LabelTable;
use crate::processors::normalization::NormalizeImage;
use crate::processors::ranking::{to_ranked_predictions, truncate_top_k, Prediction};
use crate::utils::image::{resize_to_exact, rgb_from_bgr_raw};
use crate::utils::timing::Stopwatch;
use image::RgbImage;
use serde::Serialize;
use std::path::Path;

/// The outcome of one classification call.
///
/// Owned solely by the caller; the pipeline retains nothing.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    /// Ranked predictions, sorted by confidence descending and truncated to top-k.
    pub predictions: Vec<Prediction>,
    /// Wall-clock duration of the forward pass alone, in milliseconds.
    pub inference_time_ms: f64,
}

/// Classifies single images against a pretrained ONNX model.
///
/// Safe to share across threads: decoding, normalization and ranking are
/// pure functions of their inputs, the label table is immutable after load,
/// and the engine serializes access to its sessions internally.
pub struct ImageClassifier {
    input_shape: (u32, u32),
    top_k: usize,
    decoder: Box<dyn ImageDecoder + Send + Sync>,
    normalize: NormalizeImage,
    engine: OrtEngine,
    labels: LabelTable,
}

impl std::fmt::Debug for ImageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageClassifier")
            .field("input_shape", &self.input_shape)
            .field("top_k", &self.top_k)
            .field("labels", &self.labels.len())
            .field("engine", &self.engine)
            .finish()
    }
}

impl ImageClassifier {
    /// Builds a classifier from a validated settings object.
    ///
    /// Construction is where all configuration problems surface: missing
    /// files, unloadable models, and a label table whose length disagrees
    /// with the model's declared output width are all fatal here, never at
    /// prediction time.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        config.validate()?;

        let decoder = create_decoder(config.decoder);
        let engine = create_engine(config.engine, config)?;
        let labels = LabelTable::from_file(&config.label_path)?;

        if let Some(classes) = engine.output_classes() {
            labels.validate_count(classes)?;
        }

        tracing::debug!(
            model = %engine.model_name(),
            labels = labels.len(),
            input_shape = ?(config.input_width, config.input_height),
            "classifier ready"
        );

        Ok(Self {
            input_shape: (config.input_width, config.input_height),
            top_k: config.top_k,
            decoder,
            normalize: NormalizeImage::imagenet()?,
            engine,
            labels,
        })
    }

    /// Returns a builder for assembling a classifier from positional values.
    pub fn builder() -> ImageClassifierBuilder {
        ImageClassifierBuilder::new()
    }

    /// Returns the loaded model's input/output tensor description.
    pub fn model_details(&self) -> ModelDetails {
        self.engine.details()
    }

    /// Classifies an encoded image held in a byte buffer.
    ///
    /// `top_k` overrides the configured default when given.
    pub fn classify_bytes(
        &self,
        bytes: &[u8],
        top_k: Option<usize>,
    ) -> Result<ClassificationResult, ClassifierError> {
        let img = self.decoder.decode_bytes(bytes)?;
        self.classify_image(img, top_k)
    }

    /// Classifies an image loaded from a filesystem path.
    pub fn classify_path(
        &self,
        path: &Path,
        top_k: Option<usize>,
    ) -> Result<ClassificationResult, ClassifierError> {
        let img = self.decoder.load_path(path)?;
        self.classify_image(img, top_k)
    }

    /// Classifies an already-decoded frame in BGR channel order.
    ///
    /// Capture sources in the OpenCV tradition produce BGR buffers; the
    /// channels are swapped to RGB before the shared preprocessing path.
    pub fn classify_bgr_frame(
        &self,
        width: u32,
        height: u32,
        data: &[u8],
        top_k: Option<usize>,
    ) -> Result<ClassificationResult, ClassifierError> {
        let img = rgb_from_bgr_raw(width, height, data).ok_or_else(|| {
            ClassifierError::InvalidInput {
                message: format!(
                    "BGR frame data length {} does not match {}x{}x3",
                    data.len(),
                    width,
                    height
                ),
            }
        })?;
        self.classify_image(img, top_k)
    }

    /// Resizes and normalizes a decoded RGB image into the model input tensor.
    ///
    /// The output always has shape (1, 3, input_height, input_width),
    /// fully standardized. Applied twice to the same image it produces
    /// bit-identical tensors.
    pub fn preprocess(&self, img: &RgbImage) -> Result<crate::core::Tensor4D, ClassifierError> {
        let (width, height) = self.input_shape;
        let resized = resize_to_exact(img, width, height);
        self.normalize.normalize_to(&resized)
    }

    fn classify_image(
        &self,
        img: RgbImage,
        top_k: Option<usize>,
    ) -> Result<ClassificationResult, ClassifierError> {
        let tensor = self.preprocess(&img)?;

        let watch = Stopwatch::start();
        let scores = self.engine.run(&tensor)?;
        let inference_time_ms = watch.elapsed_ms();

        tracing::debug!(
            model = %self.engine.model_name(),
            inference_time_ms,
            "forward pass complete"
        );

        let ranked = to_ranked_predictions(&scores, &self.labels)?;
        let k = top_k.unwrap_or(self.top_k);

        Ok(ClassificationResult {
            predictions: truncate_top_k(ranked, k),
            inference_time_ms,
        })
    }
}

/// Builder for [`ImageClassifier`].
#[derive(Debug, Default)]
pub struct ImageClassifierBuilder {
    config: ClassifierConfig,
}

impl ImageClassifierBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ClassifierConfig::default(),
        }
    }

    /// Sets the path to the ONNX model artifact.
    pub fn model_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.model_path = path.into();
        self
    }

    /// Sets the path to the label file.
    pub fn label_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.label_path = path.into();
        self
    }

    /// Sets the default number of ranked predictions to return.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Sets the model input shape as (width, height).
    pub fn input_shape(mut self, shape: (u32, u32)) -> Self {
        self.config.input_width = shape.0;
        self.config.input_height = shape.1;
        self
    }

    /// Sets the intra-op thread count hint for the inference runtime.
    pub fn intra_threads(mut self, threads: usize) -> Self {
        self.config.intra_threads = Some(threads);
        self
    }

    /// Selects the image decoder implementation.
    pub fn decoder(mut self, kind: DecoderKind) -> Self {
        self.config.decoder = kind;
        self
    }

    /// Selects the inference engine implementation.
    pub fn engine(mut self, kind: EngineKind) -> Self {
        self.config.engine = kind;
        self
    }

    /// Builds the classifier, validating the assembled configuration.
    pub fn build(self) -> Result<ImageClassifier, ClassifierError> {
        ImageClassifier::from_config(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_with_missing_model_reports_not_ready() {
        let mut labels = NamedTempFile::new().unwrap();
        writeln!(labels, "tabby cat").unwrap();

        let result = ImageClassifier::builder()
            .model_path("/nonexistent/resnet50.onnx")
            .label_path(labels.path())
            .build();

        // The error is captured with a message; the process does not crash.
        match result {
            Err(ClassifierError::Config { message }) => {
                assert!(message.contains("does not exist"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_with_corrupted_model_is_config_scoped() {
        let mut model = NamedTempFile::new().unwrap();
        model.write_all(b"not a valid onnx artifact").unwrap();
        let mut labels = NamedTempFile::new().unwrap();
        writeln!(labels, "tabby cat").unwrap();

        let result = ImageClassifier::builder()
            .model_path(model.path())
            .label_path(labels.path())
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_carries_settings_into_config() {
        let builder = ImageClassifier::builder()
            .model_path("m.onnx")
            .label_path("l.txt")
            .top_k(3)
            .input_shape((128, 96))
            .intra_threads(2);

        assert_eq!(builder.config.top_k, 3);
        assert_eq!(builder.config.input_width, 128);
        assert_eq!(builder.config.input_height, 96);
        assert_eq!(builder.config.intra_threads, Some(2));
    }

    #[test]
    fn test_result_serializes_for_transport() {
        let result = ClassificationResult {
            predictions: vec![Prediction {
                label: "tabby cat".to_string(),
                confidence: 0.91,
            }],
            inference_time_ms: 12.5,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("tabby cat"));
        assert!(json.contains("inference_time_ms"));
    }
}
