//! Bone-age prediction boundary
//!
//! The pipeline hands its tensor to an opaque predictor behind the
//! [`BoneAgePredictor`] trait. Swapping the mock for a trained model is a
//! wiring change at construction time, never a branch inside the pipeline.

mod mock;
mod predictor;

pub use mock::MockPredictor;
pub use predictor::{BoneAgePredictor, Prediction};
