use std::path::Path;

use ndarray::Array4;
use tracing::{info, instrument};

use crate::preprocessing::{
    common::error::{PreprocessError, Result},
    dicom::{DicomMetadata, DicomReader, DicomRsReader},
    normalizer::{ImageNormalizer, NormalizerConfig},
};

/// Result of a full preprocessing run: the model input tensor, plus the
/// informational metadata when the source was a DICOM object.
#[derive(Debug)]
pub struct PreprocessOutput {
    pub tensor: Array4<f32>,
    pub dicom: Option<DicomMetadata>,
}

pub struct PreprocessPipeline<D: DicomReader> {
    dicom_reader: D,
    normalizer: ImageNormalizer,
}

impl PreprocessPipeline<DicomRsReader> {
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            dicom_reader: DicomRsReader,
            normalizer: ImageNormalizer::new(config),
        }
    }
}

impl<D: DicomReader> PreprocessPipeline<D> {
    pub fn with_custom(dicom_reader: D, config: NormalizerConfig) -> Self {
        Self {
            dicom_reader,
            normalizer: ImageNormalizer::new(config),
        }
    }

    /// Preprocesses uploaded bytes into a model input tensor.
    ///
    /// DICOM objects are decoded into a displayable raster image first and
    /// join the normalizer mid-pipeline; any other byte stream is treated as
    /// an encoded raster image. Runs to completion or fails atomically with a
    /// typed error; no partial tensors are produced.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn run(&self, input_data: &[u8]) -> Result<PreprocessOutput> {
        info!("Starting preprocessing");

        let is_dicom = {
            let _span = tracing::info_span!("detect_dicom").entered();
            self.dicom_reader.is_dicom(input_data)
        };

        let output = if is_dicom {
            let (image, metadata) = {
                let _span = tracing::info_span!("decode_dicom").entered();
                self.dicom_reader.decode(input_data)?
            };

            let tensor = {
                let _span = tracing::info_span!("normalize").entered();
                self.normalizer.preprocess_image(image)?
            };

            PreprocessOutput {
                tensor,
                dicom: Some(metadata),
            }
        } else {
            let tensor = {
                let _span = tracing::info_span!("normalize").entered();
                self.normalizer.preprocess_bytes(input_data)?
            };

            PreprocessOutput {
                tensor,
                dicom: None,
            }
        };

        info!(
            shape = ?output.tensor.shape(),
            dicom = output.dicom.is_some(),
            "Preprocessing complete"
        );
        Ok(output)
    }

    /// Reads a file and preprocesses its contents.
    #[instrument(skip(self, input_path))]
    pub fn run_file<P: AsRef<Path>>(&self, input_path: P) -> Result<PreprocessOutput> {
        let input_path = input_path.as_ref();

        info!(input = %input_path.display(), "Preprocessing file");

        let input_data = {
            let _span = tracing::info_span!("read_input_file").entered();
            std::fs::read(input_path).map_err(|e| {
                PreprocessError::InputReadError(format!("{}: {}", input_path.display(), e))
            })?
        };

        self.run(&input_data)
    }

    pub fn config(&self) -> &NormalizerConfig {
        self.normalizer.config()
    }
}
