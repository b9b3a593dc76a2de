//! Utility functions for image decoding and geometry.
//!
//! This module provides functions for decoding encoded image bytes, loading
//! images from disk, resizing to a model's fixed input size, and building
//! RGB images from raw BGR-ordered buffers.

use crate::core::errors::ClassifierError;
use image::{imageops::FilterType, DynamicImage, ImageBuffer, RgbImage};

/// Decodes an encoded image (PNG, JPEG, ...) from a byte buffer into an RgbImage.
///
/// # Errors
///
/// Returns `ClassifierError::Decode` if the bytes are empty or not a valid,
/// recognized image encoding.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<RgbImage, ClassifierError> {
    let img = image::load_from_memory(bytes).map_err(ClassifierError::Decode)?;
    Ok(img.to_rgb8())
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Errors
///
/// Returns `ClassifierError::Decode` if the path does not resolve to a
/// readable image file or the content is not a recognized encoding.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, ClassifierError> {
    let img = image::open(path).map_err(ClassifierError::Decode)?;
    Ok(img.to_rgb8())
}

/// Resizes an image to exactly `width` x `height` with bilinear filtering.
///
/// The aspect ratio is intentionally not preserved: non-square sources are
/// geometrically distorted to the target size, matching what the models
/// were trained against. No letterboxing or cropping happens here.
pub fn resize_to_exact(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    DynamicImage::ImageRgb8(img.clone())
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgb8()
}

/// Builds an RgbImage from a raw BGR-ordered pixel buffer.
///
/// Capture sources in the OpenCV tradition hand over pixels in
/// blue-green-red order; the models are trained on red-green-blue data, so
/// the channels are swapped while copying. The data length must be exactly
/// `width * height * 3`.
pub fn rgb_from_bgr_raw(width: u32, height: u32, data: &[u8]) -> Option<RgbImage> {
    if data.len() != (width as usize) * (height as usize) * 3 {
        return None;
    }

    let rgb: Vec<u8> = data
        .chunks_exact(3)
        .flat_map(|bgr| [bgr[2], bgr[1], bgr[0]])
        .collect();

    ImageBuffer::from_raw(width, height, rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn encode_png(img: &RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img.clone())
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_round_trip() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 0, 255]));

        let decoded = decode_image_bytes(&encode_png(&img)).unwrap();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(decoded.get_pixel(1, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_decode_empty_bytes_fails() {
        let result = decode_image_bytes(&[]);
        assert!(matches!(result, Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn test_decode_garbage_bytes_fails() {
        let result = decode_image_bytes(b"definitely not an image");
        assert!(matches!(result, Err(ClassifierError::Decode(_))));
    }

    #[test]
    fn test_load_missing_path_fails() {
        let result = load_image(std::path::Path::new("/nonexistent/cat.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn test_resize_to_exact_ignores_aspect_ratio() {
        let img = RgbImage::new(100, 50);
        let resized = resize_to_exact(&img, 224, 224);
        assert_eq!(resized.dimensions(), (224, 224));
    }

    #[test]
    fn test_resize_noop_for_matching_dimensions() {
        let img = RgbImage::new(224, 224);
        let resized = resize_to_exact(&img, 224, 224);
        assert_eq!(resized.dimensions(), (224, 224));
    }

    #[test]
    fn test_rgb_from_bgr_raw_swaps_channels() {
        // One pixel: blue=10, green=20, red=30 in BGR order.
        let img = rgb_from_bgr_raw(1, 1, &[10, 20, 30]).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([30, 20, 10]));
    }

    #[test]
    fn test_rgb_from_bgr_raw_rejects_bad_length() {
        assert!(rgb_from_bgr_raw(2, 2, &[0u8; 3]).is_none());
    }
}
