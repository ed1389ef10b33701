//! Normalizer configuration and diagnostic types

use ndarray::Array4;
use serde::Serialize;

/// Spatial input size expected by the bone-age model.
pub const DEFAULT_TARGET_SIZE: (u32, u32) = (384, 384);

/// Configuration for image normalization
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Spatial dimensions (width, height) of the produced tensor.
    /// Inputs are stretched to fit exactly; aspect ratio is not preserved.
    pub target_size: (u32, u32),
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
        }
    }
}

impl NormalizerConfig {
    pub fn builder() -> NormalizerConfigBuilder {
        NormalizerConfigBuilder::default()
    }
}

/// Builder for NormalizerConfig
#[derive(Default)]
pub struct NormalizerConfigBuilder {
    target_size: Option<(u32, u32)>,
}

impl NormalizerConfigBuilder {
    pub fn target_size(mut self, width: u32, height: u32) -> Self {
        self.target_size = Some((width, height));
        self
    }

    pub fn build(self) -> NormalizerConfig {
        let default = NormalizerConfig::default();
        NormalizerConfig {
            target_size: self.target_size.unwrap_or(default.target_size),
        }
    }
}

/// Read-only summary of a produced tensor, for observability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorStats {
    pub shape: Vec<usize>,
    pub dtype: &'static str,
    pub min: f32,
    pub max: f32,
    pub mean: f32,
}

/// Summarizes the shape and value distribution of a model input tensor.
pub fn describe(tensor: &Array4<f32>) -> TensorStats {
    let min = tensor.iter().copied().fold(f32::INFINITY, f32::min);
    let max = tensor.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    TensorStats {
        shape: tensor.shape().to_vec(),
        dtype: "f32",
        min,
        max,
        mean: tensor.mean().unwrap_or(0.0),
    }
}
