//! Bone-age preprocessing library
//!
//! This crate turns an uploaded radiograph (encoded raster image or DICOM
//! object) into a fixed-shape `f32` tensor ready for a bone-age vision model,
//! and defines the predictor boundary that consumes it.

pub mod logger;
pub mod model;
pub mod preprocessing;
pub mod validation;
