//! # Percept
//!
//! A Rust image classification library that serves pretrained ONNX models.
//! Feed it encoded image bytes (or a local file) and it returns a ranked
//! list of labeled confidences together with the inference wall-clock time.
//!
//! ## Features
//!
//! - Image decoding, resizing and ImageNet-style normalization
//! - ONNX Runtime integration with a session pool for concurrent calls
//! - Numerically stable softmax and top-k ranking
//! - Tagged factories for swapping decoder/engine implementations
//! - Configuration from explicit values, JSON files, or environment variables
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, label tables, the inference engine and factories
//! * [`processors`] - Tensor normalization and score ranking
//! * [`predictor`] - The end-to-end classification pipeline
//! * [`utils`] - Image decoding helpers and timing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use percept::prelude::*;
//!
//! # fn main() -> Result<(), percept::core::ClassifierError> {
//! let classifier = ImageClassifier::builder()
//!     .model_path("models/resnet50.onnx")
//!     .label_path("models/imagenet_classes.txt")
//!     .top_k(5)
//!     .build()?;
//!
//! let bytes = std::fs::read("tigercat.jpg")?;
//! let result = classifier.classify_bytes(&bytes, None)?;
//! for p in &result.predictions {
//!     println!("{}: {:.4}", p.label, p.confidence);
//! }
//! println!("inference took {:.2} ms", result.inference_time_ms);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::core::{
        create_decoder, create_engine, ClassifierConfig, ClassifierError, DecoderKind,
        DefaultImageDecoder, EngineKind, ImageDecoder, LabelTable, ModelDetails, OrtEngine,
        Tensor2D, Tensor4D,
    };
    pub use crate::predictor::{ClassificationResult, ImageClassifier, ImageClassifierBuilder};
    pub use crate::processors::{to_ranked_predictions, truncate_top_k, NormalizeImage, Prediction};
    pub use crate::utils::{decode_image_bytes, load_image, Stopwatch};
}
