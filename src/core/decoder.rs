//! Image decoder trait and its default implementation.
//!
//! The decoder is the pipeline's entry boundary: whatever the source
//! (encoded bytes or a local file), everything downstream sees an RGB
//! pixel grid.

use crate::core::errors::ClassifierError;
use crate::utils::image::{decode_image_bytes, load_image};
use image::RgbImage;
use std::path::Path;

/// Decodes image sources into RGB pixel grids.
///
/// Implementations must produce red-green-blue channel order; sources that
/// decode to another order are corrected before returning.
pub trait ImageDecoder {
    /// Decodes an encoded image from a byte buffer.
    fn decode_bytes(&self, bytes: &[u8]) -> Result<RgbImage, ClassifierError>;

    /// Loads and decodes an image from a filesystem path.
    fn load_path(&self, path: &Path) -> Result<RgbImage, ClassifierError>;
}

/// Default decoder backed by the `image` crate.
///
/// The `image` crate decodes directly into RGB, so no channel reorder is
/// needed on this path.
#[derive(Debug, Default)]
pub struct DefaultImageDecoder;

impl DefaultImageDecoder {
    /// Creates a new default decoder.
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for DefaultImageDecoder {
    fn decode_bytes(&self, bytes: &[u8]) -> Result<RgbImage, ClassifierError> {
        decode_image_bytes(bytes)
    }

    fn load_path(&self, path: &Path) -> Result<RgbImage, ClassifierError> {
        load_image(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_bytes_rejects_empty_buffer() {
        let decoder = DefaultImageDecoder::new();
        let result = decoder.decode_bytes(&[]);
        assert!(matches!(result, Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn test_load_path_rejects_missing_file() {
        let decoder = DefaultImageDecoder::new();
        let result = decoder.load_path(Path::new("/nonexistent/image.png"));
        assert!(result.is_err());
    }
}
