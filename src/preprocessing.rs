//! Radiograph preprocessing module
//!
//! This module provides a structured approach to turning uploaded image bytes
//! into model-ready tensors, with separate modules for DICOM reading, image
//! normalization, and pipeline orchestration.

pub mod common;
pub mod dicom;
pub mod normalizer;
pub mod pipeline;

pub use common::{
    PreprocessError,
    Result,
};

pub use dicom::{
    DicomMetadata,
    DicomReader,
    DicomRsReader,
};

pub use normalizer::{
    ImageNormalizer,
    NormalizerConfig,
    NormalizerConfigBuilder,
    TensorStats,
    describe,
};

pub use pipeline::{
    PreprocessOutput,
    PreprocessPipeline,
};
