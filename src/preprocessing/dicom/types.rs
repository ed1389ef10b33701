//! DICOM metadata types

use serde::Serialize;

/// Informational metadata extracted from a DICOM object.
///
/// Every field is best-effort: absent or unreadable tags fall back to the
/// defaults below rather than failing the decode. The record is built once
/// per decode and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DicomMetadata {
    /// Patient age as stored in the file (e.g. "012Y"), `"N/A"` when absent
    pub patient_age: String,
    /// Patient sex code (`"M"`, `"F"`, `"O"`), `"N/A"` when absent
    pub patient_sex: String,
    /// Number of rows in the stored image, `0` when absent
    pub rows: u32,
    /// Number of columns in the stored image, `0` when absent
    pub columns: u32,
    /// Physical spacing between pixel centers in mm, `[0.0, 0.0]` when absent
    pub pixel_spacing: [f64; 2],
    /// Equipment manufacturer, `"N/A"` when absent
    pub manufacturer: String,
    /// Equipment model name, `"N/A"` when absent
    pub model_name: String,
    /// Study date as stored (YYYYMMDD), `"N/A"` when absent
    pub study_date: String,
}

impl Default for DicomMetadata {
    fn default() -> Self {
        Self {
            patient_age: "N/A".to_string(),
            patient_sex: "N/A".to_string(),
            rows: 0,
            columns: 0,
            pixel_spacing: [0.0, 0.0],
            manufacturer: "N/A".to_string(),
            model_name: "N/A".to_string(),
            study_date: "N/A".to_string(),
        }
    }
}
