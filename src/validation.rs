//! Upload admission checks.
//!
//! These run at the request boundary, before any bytes reach the
//! preprocessing pipeline. The pipeline still defends against malformed
//! bytes on its own; these checks only reject obviously invalid uploads
//! early with a clear reason.

use thiserror::Error;

/// Maximum accepted upload size (20 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UploadError {
    #[error("File must be an image (JPEG, PNG, DICOM, ...)")]
    NotAnImage,

    #[error("File too large: {0} bytes (maximum {MAX_UPLOAD_BYTES})")]
    TooLarge(u64),
}

/// Validates the declared content type and byte length of an upload.
pub fn validate_upload(content_type: Option<&str>, len: u64) -> Result<(), UploadError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => {}
        _ => return Err(UploadError::NotAnImage),
    }

    if len > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge(len));
    }

    Ok(())
}
