//! Image normalization module
//!
//! This module turns decoded raster images into fixed-shape, fixed-range
//! tensors matching the downstream model's input contract.

mod image_normalizer;
pub mod types;

pub use image_normalizer::ImageNormalizer;
pub use types::{NormalizerConfig, NormalizerConfigBuilder, TensorStats, describe};
