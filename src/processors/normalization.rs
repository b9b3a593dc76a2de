//! Image normalization for model input.
//!
//! Turns an RGB pixel grid into the normalized channel-first tensor a
//! pretrained convolutional model expects: values scaled to [0, 1], then
//! standardized per channel with the statistics the model was trained
//! against, laid out as (batch=1, channel, height, width).

use crate::core::constants::{IMAGENET_MEAN, IMAGENET_STD};
use crate::core::errors::ClassifierError;
use crate::core::Tensor4D;
use image::RgbImage;

/// Normalizes images into model input tensors.
///
/// The per-pixel transform `(value * scale - mean) / std` is folded into two
/// precomputed coefficients per channel: `alpha = scale / std` and
/// `beta = -mean / std`.
#[derive(Debug)]
pub struct NormalizeImage {
    /// Scaling factors for each channel (alpha = scale / std)
    alpha: Vec<f32>,
    /// Offset values for each channel (beta = -mean / std)
    beta: Vec<f32>,
}

impl NormalizeImage {
    /// Creates a normalizer with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `scale` - Optional scaling factor (defaults to 1.0/255.0)
    /// * `mean` - Optional per-channel mean (defaults to the ImageNet statistics)
    /// * `std` - Optional per-channel standard deviation (defaults to the ImageNet statistics)
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if scale is not positive, mean or std do not
    /// have exactly 3 elements, or any standard deviation is not positive.
    pub fn new(
        scale: Option<f32>,
        mean: Option<Vec<f32>>,
        std: Option<Vec<f32>>,
    ) -> Result<Self, ClassifierError> {
        let scale = scale.unwrap_or(1.0 / 255.0);
        let mean = mean.unwrap_or_else(|| IMAGENET_MEAN.to_vec());
        let std = std.unwrap_or_else(|| IMAGENET_STD.to_vec());

        if scale <= 0.0 {
            return Err(ClassifierError::Config {
                message: "scale must be greater than 0".to_string(),
            });
        }

        if mean.len() != 3 || std.len() != 3 {
            return Err(ClassifierError::Config {
                message: "mean and std must have exactly 3 elements for RGB".to_string(),
            });
        }

        for (i, &s) in std.iter().enumerate() {
            if s <= 0.0 {
                return Err(ClassifierError::Config {
                    message: format!(
                        "standard deviation at index {i} must be greater than 0, got {s}"
                    ),
                });
            }
        }

        let alpha: Vec<f32> = std.iter().map(|s| scale / s).collect();
        let beta: Vec<f32> = mean.iter().zip(&std).map(|(m, s)| -m / s).collect();

        for (i, (&a, &b)) in alpha.iter().zip(&beta).enumerate() {
            if !a.is_finite() || !b.is_finite() {
                return Err(ClassifierError::Config {
                    message: format!("normalization coefficients at index {i} are not finite"),
                });
            }
        }

        Ok(Self { alpha, beta })
    }

    /// Creates a normalizer with the ImageNet statistics used by the
    /// reference pretrained classification models.
    pub fn imagenet() -> Result<Self, ClassifierError> {
        Self::new(None, None, None)
    }

    /// Normalizes a single RGB image into a 4D channel-first tensor.
    ///
    /// The output shape is always (1, 3, height, width): the pixel grid is
    /// transposed from the decoder's height-width-channel layout to
    /// channel-height-width, and a leading batch dimension of 1 is added.
    pub fn normalize_to(&self, img: &RgbImage) -> Result<Tensor4D, ClassifierError> {
        let (width, height) = img.dimensions();
        let channels = 3usize;
        let plane = (height * width) as usize;

        let mut result = vec![0.0f32; channels * plane];

        for (x, y, pixel) in img.enumerate_pixels() {
            let offset = (y * width + x) as usize;
            for c in 0..channels {
                result[c * plane + offset] = pixel[c] as f32 * self.alpha[c] + self.beta[c];
            }
        }

        ndarray::Array4::from_shape_vec((1, channels, height as usize, width as usize), result)
            .map_err(ClassifierError::Tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-5,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        assert!(NormalizeImage::new(Some(0.0), None, None).is_err());
        assert!(NormalizeImage::new(Some(-1.0), None, None).is_err());
    }

    #[test]
    fn test_rejects_wrong_channel_count() {
        let result = NormalizeImage::new(None, Some(vec![0.5, 0.5]), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_std() {
        let result = NormalizeImage::new(None, None, Some(vec![0.2, 0.0, 0.2]));
        assert!(result.is_err());
    }

    #[test]
    fn test_output_shape_is_batch_channel_height_width() {
        let normalize = NormalizeImage::imagenet().unwrap();
        let img = RgbImage::new(32, 16);
        let tensor = normalize.normalize_to(&img).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 16, 32]);
    }

    #[test]
    fn test_normalization_is_idempotent_over_input() {
        let normalize = NormalizeImage::imagenet().unwrap();
        let mut img = RgbImage::new(4, 4);
        for (i, pixel) in img.pixels_mut().enumerate() {
            *pixel = Rgb([(i * 13 % 256) as u8, (i * 29 % 256) as u8, (i * 53 % 256) as u8]);
        }

        let first = normalize.normalize_to(&img).unwrap();
        let second = normalize.normalize_to(&img).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_standardized_values_match_reference() {
        // 2x2 grid in row-major order: black, white, mid gray, dark gray.
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        img.put_pixel(0, 1, Rgb([128, 128, 128]));
        img.put_pixel(1, 1, Rgb([64, 64, 64]));

        let normalize = NormalizeImage::imagenet().unwrap();
        let tensor = normalize.normalize_to(&img).unwrap();

        // Red channel: (v/255 - 0.485) / 0.229
        assert_close(tensor[[0, 0, 0, 0]], -2.1179);
        assert_close(tensor[[0, 0, 0, 1]], 2.2489);
        assert_close(tensor[[0, 0, 1, 0]], 0.0741);
        assert_close(tensor[[0, 0, 1, 1]], -1.0219);

        // Green channel: (v/255 - 0.456) / 0.224
        assert_close(tensor[[0, 1, 0, 0]], -2.0357);
        assert_close(tensor[[0, 1, 0, 1]], 2.4286);

        // Blue channel: (v/255 - 0.406) / 0.225
        assert_close(tensor[[0, 2, 0, 0]], -1.8044);
        assert_close(tensor[[0, 2, 0, 1]], 2.64);
    }

    #[test]
    fn test_identity_statistics_scale_only() {
        // With mean 0 and std 1 the transform reduces to value / 255.
        let normalize =
            NormalizeImage::new(None, Some(vec![0.0; 3]), Some(vec![1.0; 3])).unwrap();
        let mut img = RgbImage::new(1, 1);
        img.put_pixel(0, 0, Rgb([255, 128, 0]));

        let tensor = normalize.normalize_to(&img).unwrap();
        assert_close(tensor[[0, 0, 0, 0]], 1.0);
        assert_close(tensor[[0, 1, 0, 0]], 128.0 / 255.0);
        assert_close(tensor[[0, 2, 0, 0]], 0.0);
    }
}
