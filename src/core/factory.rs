//! Tagged factories for decoder and engine construction.
//!
//! Concrete implementations are selected by an enumerated type tag, resolved
//! eagerly at construction time. Tags arriving as strings (from config files
//! or the environment) that name no registered implementation fail with a
//! configuration error identifying the tag.

use crate::core::config::ClassifierConfig;
use crate::core::decoder::{DefaultImageDecoder, ImageDecoder};
use crate::core::errors::ClassifierError;
use crate::core::inference::OrtEngine;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported image decoder implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecoderKind {
    /// Decoder backed by the `image` crate.
    #[default]
    Image,
}

impl FromStr for DecoderKind {
    type Err = ClassifierError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "image" => Ok(DecoderKind::Image),
            other => Err(ClassifierError::Config {
                message: format!("unsupported image decoder type '{other}' (supported: image)"),
            }),
        }
    }
}

impl std::fmt::Display for DecoderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoderKind::Image => write!(f, "image"),
        }
    }
}

/// Supported inference engine implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineKind {
    /// ONNX Runtime engine for models in the ONNX exchange format.
    #[default]
    Onnx,
}

impl FromStr for EngineKind {
    type Err = ClassifierError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "onnx" => Ok(EngineKind::Onnx),
            other => Err(ClassifierError::Config {
                message: format!("unsupported model engine type '{other}' (supported: onnx)"),
            }),
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineKind::Onnx => write!(f, "onnx"),
        }
    }
}

/// Instantiates the decoder registered for `kind`.
pub fn create_decoder(kind: DecoderKind) -> Box<dyn ImageDecoder + Send + Sync> {
    match kind {
        DecoderKind::Image => Box::new(DefaultImageDecoder::new()),
    }
}

/// Instantiates the engine registered for `kind` from a settings object.
///
/// # Errors
///
/// Returns a `Config` error if the model artifact cannot be loaded.
pub fn create_engine(
    kind: EngineKind,
    config: &ClassifierConfig,
) -> Result<OrtEngine, ClassifierError> {
    match kind {
        EngineKind::Onnx => OrtEngine::from_config(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoder_kind_round_trip() {
        assert_eq!("image".parse::<DecoderKind>().unwrap(), DecoderKind::Image);
        assert_eq!(DecoderKind::Image.to_string(), "image");
    }

    #[test]
    fn test_unsupported_decoder_tag_names_the_tag() {
        let err = "opencv".parse::<DecoderKind>().unwrap_err();
        assert!(err.to_string().contains("'opencv'"));
        assert!(matches!(err, ClassifierError::Config { .. }));
    }

    #[test]
    fn test_unsupported_engine_tag_names_the_tag() {
        let err = "tensorrt".parse::<EngineKind>().unwrap_err();
        assert!(err.to_string().contains("'tensorrt'"));
    }

    #[test]
    fn test_create_decoder_returns_default_decoder() {
        // Smoke test: the factory resolves the tag without touching the filesystem.
        let _decoder = create_decoder(DecoderKind::Image);
    }
}
