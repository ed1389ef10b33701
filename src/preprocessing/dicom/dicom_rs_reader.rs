//! DICOM reader implementation using the dicom-rs library.
//!
//! This module decodes DICOM objects into displayable raster images. It
//! applies the embedded rescale transform (when present) to raw pixel values,
//! stretches the result into the 8-bit display range, and extracts a small
//! set of informational metadata fields.

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::{FileDicomObject, InMemDicomObject, from_reader};
use dicom::pixeldata::PixelDecoder;
use image::{DynamicImage, GrayImage, RgbImage};
use ndarray::{Array3, ArrayView3, Axis};
use tracing::{debug, warn};

use crate::preprocessing::common::error::{PreprocessError, Result};
use crate::preprocessing::dicom::reader::DicomReader;
use crate::preprocessing::dicom::types::DicomMetadata;

/// DICOM reader that uses dicom-rs for parsing and pixel data decoding.
///
/// Handles both Part 10 streams (128-byte preamble followed by the DICM
/// magic) and bare data sets that start at the file meta group.
pub struct DicomRsReader;

/// Length of the Part 10 file preamble preceding the DICM magic code.
const PREAMBLE_LEN: usize = 128;

const DICM_MAGIC: &[u8; 4] = b"DICM";

type DicomObject = FileDicomObject<InMemDicomObject>;

impl DicomRsReader {
    fn parse(&self, data: &[u8]) -> Result<DicomObject> {
        // from_reader expects the DICM magic first; strip the Part 10
        // preamble when one is present.
        let stream = if data.len() > PREAMBLE_LEN + DICM_MAGIC.len()
            && &data[PREAMBLE_LEN..PREAMBLE_LEN + DICM_MAGIC.len()] == DICM_MAGIC
        {
            &data[PREAMBLE_LEN..]
        } else {
            data
        };

        from_reader(stream).map_err(|e| PreprocessError::DicomDecodeError(e.to_string()))
    }
}

impl DicomReader for DicomRsReader {
    fn is_dicom(&self, data: &[u8]) -> bool {
        self.parse(data).is_ok()
    }

    /// Decodes a DICOM byte stream into a raster image plus metadata.
    ///
    /// This method:
    /// 1. Parses the object and rejects it if no PixelData attribute exists
    /// 2. Decodes the pixel data into a frames x rows x cols x samples array
    /// 3. Applies `value = raw * slope + intercept` when rescale tags are present
    /// 4. Stretches the values into the 0-255 display range
    /// 5. Builds a grayscale or RGB raster image from the result
    ///
    /// Metadata extraction is best-effort: unreadable fields are logged and
    /// fall back to their defaults without failing the decode.
    fn decode(&self, data: &[u8]) -> Result<(DynamicImage, DicomMetadata)> {
        debug!("Decoding DICOM object, {} bytes", data.len());

        let obj = self.parse(data)?;

        let has_pixel_data = obj
            .element_opt(tags::PIXEL_DATA)
            .map_err(|e| PreprocessError::DicomDecodeError(e.to_string()))?
            .is_some();
        if !has_pixel_data {
            return Err(PreprocessError::MissingPixelData);
        }

        let decoded = obj
            .decode_pixel_data()
            .map_err(|e| PreprocessError::DicomDecodeError(e.to_string()))?;
        let frames = decoded
            .to_ndarray::<f64>()
            .map_err(|e| PreprocessError::DicomDecodeError(e.to_string()))?;

        // Shape is frames x rows x cols x samples. Multi-frame studies are
        // reduced to their first frame.
        let frame_count = frames.shape()[0];
        if frame_count > 1 {
            debug!(frame_count, "Multi-frame DICOM object, using first frame only");
        }
        let frame = frames
            .index_axis(Axis(0), 0)
            .into_dimensionality::<ndarray::Ix3>()
            .map_err(|e| PreprocessError::DicomDecodeError(e.to_string()))?;

        let values = match rescale_parameters(&obj) {
            Some((slope, intercept)) => apply_rescale(frame, slope, intercept)?,
            None => frame.to_owned(),
        };

        let normalized = normalize_to_u8(values);
        let image = raster_from_array(normalized)?;
        let metadata = extract_metadata(&obj);

        debug!(
            width = image.width(),
            height = image.height(),
            "DICOM decode complete"
        );
        Ok((image, metadata))
    }
}

/// Reads the rescale transform from the object. The transform applies only
/// when both the slope and the intercept tags are present.
fn rescale_parameters(obj: &DicomObject) -> Option<(f64, f64)> {
    let slope = obj
        .element_opt(tags::RESCALE_SLOPE)
        .ok()
        .flatten()?
        .to_float64()
        .ok()?;
    let intercept = obj
        .element_opt(tags::RESCALE_INTERCEPT)
        .ok()
        .flatten()?
        .to_float64()
        .ok()?;
    Some((slope, intercept))
}

/// Applies `value = raw * slope + intercept` elementwise. This runs before
/// any display-range normalization so the stretch sees physically meaningful
/// intensities.
fn apply_rescale(frame: ArrayView3<'_, f64>, slope: f64, intercept: f64) -> Result<Array3<f64>> {
    let rescaled = frame.mapv(|v| v * slope + intercept);
    if rescaled.iter().any(|v| !v.is_finite()) {
        return Err(PreprocessError::RescaleError(format!(
            "slope={slope}, intercept={intercept}"
        )));
    }
    Ok(rescaled)
}

/// Min-max stretch into the 0-255 display range. A uniform-value frame is
/// passed through unchanged (clamped into the u8 range) instead of dividing
/// by zero.
fn normalize_to_u8(values: Array3<f64>) -> Array3<u8> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max > min {
        values.mapv(|v| ((v - min) / (max - min) * 255.0).round() as u8)
    } else {
        values.mapv(|v| v.clamp(0.0, 255.0) as u8)
    }
}

/// Builds a raster image from a rows x cols x samples array of 8-bit values.
/// Single-channel sources stay grayscale here; the normalizer forces RGB
/// further down the pipeline.
fn raster_from_array(pixels: Array3<u8>) -> Result<DynamicImage> {
    let (height, width, samples) = pixels.dim();
    let data: Vec<u8> = pixels.iter().copied().collect();

    let image = match samples {
        1 => GrayImage::from_raw(width as u32, height as u32, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width as u32, height as u32, data).map(DynamicImage::ImageRgb8),
        n => {
            return Err(PreprocessError::DicomDecodeError(format!(
                "unsupported samples per pixel: {n}"
            )));
        }
    };

    image.ok_or_else(|| {
        PreprocessError::DicomDecodeError(
            "pixel buffer does not match declared dimensions".to_string(),
        )
    })
}

fn extract_metadata(obj: &DicomObject) -> DicomMetadata {
    let mut metadata = DicomMetadata::default();

    if let Some(v) = read_string(obj, tags::PATIENT_AGE) {
        metadata.patient_age = v;
    }
    if let Some(v) = read_string(obj, tags::PATIENT_SEX) {
        metadata.patient_sex = v;
    }
    if let Some(v) = read_u32(obj, tags::ROWS) {
        metadata.rows = v;
    }
    if let Some(v) = read_u32(obj, tags::COLUMNS) {
        metadata.columns = v;
    }
    if let Some(v) = read_spacing(obj) {
        metadata.pixel_spacing = v;
    }
    if let Some(v) = read_string(obj, tags::MANUFACTURER) {
        metadata.manufacturer = v;
    }
    if let Some(v) = read_string(obj, tags::MANUFACTURER_MODEL_NAME) {
        metadata.model_name = v;
    }
    if let Some(v) = read_string(obj, tags::STUDY_DATE) {
        metadata.study_date = v;
    }

    metadata
}

fn read_string(obj: &DicomObject, tag: Tag) -> Option<String> {
    match obj.element_opt(tag) {
        Ok(Some(element)) => match element.to_str() {
            Ok(v) => Some(v.trim().to_string()),
            Err(e) => {
                warn!(%tag, "Failed to read DICOM string value: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(%tag, "Failed to access DICOM element: {}", e);
            None
        }
    }
}

fn read_u32(obj: &DicomObject, tag: Tag) -> Option<u32> {
    match obj.element_opt(tag) {
        Ok(Some(element)) => match element.to_int::<u32>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(%tag, "Failed to read DICOM integer value: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(%tag, "Failed to access DICOM element: {}", e);
            None
        }
    }
}

fn read_spacing(obj: &DicomObject) -> Option<[f64; 2]> {
    match obj.element_opt(tags::PIXEL_SPACING) {
        Ok(Some(element)) => match element.to_multi_float64() {
            Ok(values) if values.len() >= 2 => Some([values[0], values[1]]),
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to read DICOM pixel spacing: {}", e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to access DICOM pixel spacing: {}", e);
            None
        }
    }
}
