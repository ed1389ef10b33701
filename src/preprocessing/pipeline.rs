//! Pipeline orchestration module
//!
//! This module routes uploaded bytes through the DICOM reader when they parse
//! as a DICOM object, then through the image normalizer.

mod preprocess;


pub use preprocess::{PreprocessOutput, PreprocessPipeline};
