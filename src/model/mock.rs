//! Stand-in predictor used until the trained model is wired in.

use ndarray::Array4;
use rand::Rng;
use tracing::debug;

use crate::model::predictor::{BoneAgePredictor, Prediction};

/// Age range (in years) the mock draws from, matching the population the
/// real model targets.
const AGE_RANGE_YEARS: std::ops::Range<f64> = 6.0..18.0;

const CONFIDENCE_RANGE: std::ops::Range<f64> = 0.85..0.98;

#[derive(Debug, Default)]
pub struct MockPredictor;

impl BoneAgePredictor for MockPredictor {
    fn predict(&self, input: &Array4<f32>) -> Prediction {
        let mut rng = rand::thread_rng();
        let age_years = rng.gen_range(AGE_RANGE_YEARS);
        let confidence = rng.gen_range(CONFIDENCE_RANGE);

        debug!(shape = ?input.shape(), "Mock prediction");

        Prediction {
            predicted_age_months: round_to(age_years * 12.0, 1),
            predicted_age_years: round_to(age_years, 1),
            confidence: round_to(confidence, 3),
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
