use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode DICOM object: {0}")]
    DicomDecodeError(String),

    #[error("DICOM object contains no pixel data")]
    MissingPixelData,

    #[error("DICOM rescale produced a non-finite value: {0}")]
    RescaleError(String),

    #[error("Normalization failed: {0}")]
    NormalizationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
