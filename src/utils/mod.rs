//! Utility functions for image handling and timing.

pub mod image;
pub mod timing;

pub use image::{decode_image_bytes, load_image, resize_to_exact, rgb_from_bgr_raw};
pub use timing::Stopwatch;
