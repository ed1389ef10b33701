//! Core image normalizer.
//!
//! Takes encoded bytes, a file path, or an already-decoded raster image and
//! produces the `[1, H, W, 3]` float tensor the bone-age model consumes:
//! decode, stretch-resize to the target geometry, force RGB, map pixel values
//! into the model's input range, and prepend the batch axis.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::{Array3, Array4, Axis};
use tracing::{debug, instrument};

use crate::preprocessing::common::error::{PreprocessError, Result};
use crate::preprocessing::normalizer::types::NormalizerConfig;

/// Per-channel shift constants of the model's pretraining convention, in BGR
/// order. The model was trained on inputs with channels reordered RGB -> BGR
/// and these means subtracted, with no scaling divisor. This mapping is a
/// contract with the trained weights and must be reproduced exactly.
const CHANNEL_MEANS_BGR: [f32; 3] = [103.939, 116.779, 123.68];

pub struct ImageNormalizer {
    config: NormalizerConfig,
}

impl ImageNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Full pipeline: encoded bytes -> model input tensor.
    #[instrument(skip(self, data), fields(input_size = data.len()))]
    pub fn preprocess_bytes(&self, data: &[u8]) -> Result<Array4<f32>> {
        let image = self.decode(data)?;
        self.preprocess_image(image)
    }

    /// Full pipeline: image file path -> model input tensor.
    #[instrument(skip(self, path))]
    pub fn preprocess_path<P: AsRef<Path>>(&self, path: P) -> Result<Array4<f32>> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            PreprocessError::InputReadError(format!("{}: {}", path.display(), e))
        })?;
        self.preprocess_bytes(&data)
    }

    /// Full pipeline: decoded raster image -> model input tensor.
    pub fn preprocess_image(&self, image: DynamicImage) -> Result<Array4<f32>> {
        let resized = self.resize(&image);
        let array = self.to_array(&resized)?;
        let mapped = range_map(array);
        let tensor = add_batch_axis(mapped);

        debug!(shape = ?tensor.shape(), "Preprocessing complete");
        Ok(tensor)
    }

    fn decode(&self, data: &[u8]) -> Result<DynamicImage> {
        let image = image::load_from_memory(data)
            .map_err(|e| PreprocessError::UnsupportedFormat(e.to_string()))?;

        debug!(
            width = image.width(),
            height = image.height(),
            "Decoded input image"
        );
        Ok(image)
    }

    /// Stretches the image to exactly the target size with a Lanczos filter.
    /// Aspect ratio is deliberately not preserved.
    fn resize(&self, image: &DynamicImage) -> DynamicImage {
        let (width, height) = self.config.target_size;
        image.resize_exact(width, height, FilterType::Lanczos3)
    }

    /// Forces 3-channel RGB and converts to a height x width x 3 float array
    /// with values still in the 0-255 range.
    fn to_array(&self, image: &DynamicImage) -> Result<Array3<f32>> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        let data: Vec<f32> = rgb.into_raw().into_iter().map(f32::from).collect();

        Array3::from_shape_vec((height as usize, width as usize, 3), data)
            .map_err(|e| PreprocessError::NormalizationError(e.to_string()))
    }
}

/// Maps 0-255 RGB intensities into the model's input range: channels are
/// reordered to BGR and shifted by the fixed per-channel means. Output values
/// land roughly in [-124, 152].
fn range_map(pixels: Array3<f32>) -> Array3<f32> {
    let (height, width, _) = pixels.dim();
    let mut mapped = Array3::zeros((height, width, 3));

    for y in 0..height {
        for x in 0..width {
            for c in 0..3 {
                mapped[[y, x, c]] = pixels[[y, x, 2 - c]] - CHANNEL_MEANS_BGR[c];
            }
        }
    }

    mapped
}

/// Prepends the unit batch axis: height x width x 3 -> 1 x height x width x 3.
fn add_batch_axis(pixels: Array3<f32>) -> Array4<f32> {
    pixels.insert_axis(Axis(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::normalizer::types::describe;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn encode(image: &DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buffer), format)
            .unwrap();
        buffer
    }

    #[test]
    fn test_output_shape_matches_target_size() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageRgb8(RgbImage::new(640, 480));

        let tensor = normalizer.preprocess_image(image).unwrap();

        assert_eq!(tensor.shape(), &[1, 384, 384, 3]);
    }

    #[test]
    fn test_custom_target_size() {
        let config = NormalizerConfig::builder().target_size(224, 224).build();
        let normalizer = ImageNormalizer::new(config);
        let image = DynamicImage::ImageRgb8(RgbImage::new(31, 57));

        let tensor = normalizer.preprocess_image(image).unwrap();

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_aspect_ratio_is_not_preserved() {
        // An extreme aspect ratio still stretches to the exact target size
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageRgb8(RgbImage::new(2000, 10));

        let tensor = normalizer.preprocess_image(image).unwrap();

        assert_eq!(tensor.shape(), &[1, 384, 384, 3]);
    }

    #[test]
    fn test_black_image_maps_to_channel_means() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageRgb8(RgbImage::new(100, 100));

        let tensor = normalizer.preprocess_image(image).unwrap();

        // No scaling divisor: black pixels land exactly on the negated means
        assert_eq!(tensor[[0, 0, 0, 0]], -103.939);
        assert_eq!(tensor[[0, 0, 0, 1]], -116.779);
        assert_eq!(tensor[[0, 0, 0, 2]], -123.68);
    }

    #[test]
    fn test_white_image_maps_to_shifted_maximum() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            64,
            64,
            Rgb([255, 255, 255]),
        ));

        let tensor = normalizer.preprocess_image(image).unwrap();

        assert_eq!(tensor[[0, 5, 5, 0]], 255.0 - 103.939);
        assert_eq!(tensor[[0, 5, 5, 1]], 255.0 - 116.779);
        assert_eq!(tensor[[0, 5, 5, 2]], 255.0 - 123.68);
    }

    #[test]
    fn test_channels_are_reordered_to_bgr() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 32, Rgb([255, 0, 0])));

        let tensor = normalizer.preprocess_image(image).unwrap();

        // Pure red ends up in the last (R) channel after the BGR reorder
        assert_eq!(tensor[[0, 10, 10, 0]], -103.939);
        assert_eq!(tensor[[0, 10, 10, 1]], -116.779);
        assert_eq!(tensor[[0, 10, 10, 2]], 255.0 - 123.68);
    }

    #[test]
    fn test_grayscale_input_is_forced_to_three_channels() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageLuma8(image::GrayImage::new(50, 50));

        let tensor = normalizer.preprocess_image(image).unwrap();

        assert_eq!(tensor.shape(), &[1, 384, 384, 3]);
    }

    #[test]
    fn test_truncated_jpeg_is_unsupported_format() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());

        let result = normalizer.preprocess_bytes(&[0xFF, 0xD8, 0xFF]);

        assert!(matches!(
            result,
            Err(PreprocessError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_arbitrary_bytes_are_unsupported_format() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());

        let result = normalizer.preprocess_bytes(b"not an image at all");

        assert!(matches!(
            result,
            Err(PreprocessError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_end_to_end_jpeg() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());

        // 1024x768 RGB gradient, round-tripped through a real JPEG encoder
        let mut source = RgbImage::new(1024, 768);
        for (x, y, pixel) in source.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
        let bytes = encode(&DynamicImage::ImageRgb8(source), image::ImageFormat::Jpeg);

        let tensor = normalizer.preprocess_bytes(&bytes).unwrap();

        assert_eq!(tensor.shape(), &[1, 384, 384, 3]);
        assert!(tensor.iter().all(|v| (-124.0..=152.0).contains(v)));
    }

    #[test]
    fn test_describe_reports_output_contract() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, Rgb([0, 0, 0])));

        let tensor = normalizer.preprocess_image(image).unwrap();
        let stats = describe(&tensor);

        assert_eq!(stats.shape, vec![1, 384, 384, 3]);
        assert_eq!(stats.dtype, "f32");
        assert_eq!(stats.min, -123.68);
        assert_eq!(stats.max, -103.939);
        let expected_mean = (-103.939 - 116.779 - 123.68) / 3.0;
        assert!((stats.mean - expected_mean).abs() < 1e-3);
    }

    #[test]
    fn test_preprocess_from_path() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.png");

        let image = DynamicImage::ImageRgb8(RgbImage::new(80, 60));
        image.save(&path).unwrap();

        let tensor = normalizer.preprocess_path(&path).unwrap();

        assert_eq!(tensor.shape(), &[1, 384, 384, 3]);
    }

    #[test]
    fn test_preprocess_from_missing_path() {
        let normalizer = ImageNormalizer::new(NormalizerConfig::default());

        let result = normalizer.preprocess_path("/nonexistent/input.png");

        assert!(matches!(result, Err(PreprocessError::InputReadError(_))));
    }
}
