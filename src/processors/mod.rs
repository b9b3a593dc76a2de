//! Image normalization and score post-processing.

pub mod normalization;
pub mod ranking;

pub use normalization::NormalizeImage;
pub use ranking::{softmax, to_ranked_predictions, truncate_top_k, Prediction};
