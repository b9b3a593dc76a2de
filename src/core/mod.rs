//! Core types for the classification pipeline.
//!
//! This module hosts the error taxonomy, configuration, label tables,
//! the ONNX Runtime inference engine and the loader factories.

pub mod config;
pub mod decoder;
pub mod errors;
pub mod factory;
pub mod inference;
pub mod labels;

pub use config::ClassifierConfig;
pub use decoder::{DefaultImageDecoder, ImageDecoder};
pub use errors::{ClassifierError, ClassifierResult};
pub use factory::{create_decoder, create_engine, DecoderKind, EngineKind};
pub use inference::{ModelDetails, OrtEngine};
pub use labels::LabelTable;

/// A 2D tensor of f32 values, used for raw classification scores
/// with shape (batch, num_classes).
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4D tensor of f32 values, used for normalized model input
/// with shape (batch, channel, height, width).
pub type Tensor4D = ndarray::Array4<f32>;

/// Shared constants used across the pipeline.
pub mod constants {
    /// Default model input height in pixels.
    pub const DEFAULT_INPUT_HEIGHT: u32 = 224;
    /// Default model input width in pixels.
    pub const DEFAULT_INPUT_WIDTH: u32 = 224;
    /// Number of color channels the models expect.
    pub const INPUT_CHANNELS: usize = 3;
    /// Default number of ranked predictions returned per image.
    pub const DEFAULT_TOP_K: usize = 5;
    /// Per-channel mean the reference pretrained models were trained against (R, G, B).
    pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
    /// Per-channel standard deviation matching [`IMAGENET_MEAN`].
    pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];
}
