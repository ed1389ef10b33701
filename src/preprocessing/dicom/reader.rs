use image::DynamicImage;

use crate::preprocessing::common::error::Result;
use crate::preprocessing::dicom::types::DicomMetadata;

pub trait DicomReader {
    /// Returns true only if `data` parses as a DICOM object. Never errors.
    fn is_dicom(&self, data: &[u8]) -> bool;

    /// Decodes a DICOM byte stream into a displayable raster image plus
    /// informational metadata.
    fn decode(&self, data: &[u8]) -> Result<(DynamicImage, DicomMetadata)>;
}
