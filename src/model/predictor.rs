use ndarray::Array4;
use serde::Serialize;

/// Bone-age estimate for a single preprocessed radiograph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Estimated bone age in months, rounded to one decimal
    pub predicted_age_months: f64,
    /// Estimated bone age in years, rounded to one decimal
    pub predicted_age_years: f64,
    /// Model confidence in [0, 1]; placeholder until a trained model ships
    pub confidence: f64,
}

/// Consumes a `[1, H, W, 3]` preprocessed tensor and returns an estimate.
pub trait BoneAgePredictor {
    fn predict(&self, input: &Array4<f32>) -> Prediction;
}
