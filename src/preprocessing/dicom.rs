//! DICOM reading module
//!
//! This module bridges DICOM's arbitrary intensity space into the same raster
//! representation as ordinary photographic images.

mod reader;
mod dicom_rs_reader;
pub mod types;

pub use reader::DicomReader;
pub use dicom_rs_reader::DicomRsReader;
pub use types::DicomMetadata;
