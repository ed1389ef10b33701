use anyhow::Result;
use boneage_rs::logger;
use boneage_rs::model::{BoneAgePredictor, MockPredictor};
use boneage_rs::preprocessing::{NormalizerConfig, PreprocessPipeline, describe};

use tracing::{error, info};

fn main() -> Result<()> {
    logger::init();

    info!("Starting bone-age preprocessing...");

    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.png".to_string());

    let config = NormalizerConfig::builder().target_size(384, 384).build();
    let pipeline = PreprocessPipeline::new(config);

    info!("Preprocess pipeline initialized");
    info!(
        "Target size: {}x{}",
        pipeline.config().target_size.0,
        pipeline.config().target_size.1
    );

    match pipeline.run_file(&input_path) {
        Ok(output) => {
            let stats = describe(&output.tensor);
            info!(
                shape = ?stats.shape,
                min = stats.min,
                max = stats.max,
                mean = stats.mean,
                "Preprocessing successful"
            );

            if let Some(metadata) = &output.dicom {
                info!(
                    patient_age = %metadata.patient_age,
                    patient_sex = %metadata.patient_sex,
                    manufacturer = %metadata.manufacturer,
                    study_date = %metadata.study_date,
                    "DICOM metadata"
                );
            }

            let prediction = MockPredictor.predict(&output.tensor);
            info!(
                months = prediction.predicted_age_months,
                years = prediction.predicted_age_years,
                confidence = prediction.confidence,
                "Predicted bone age"
            );
        }
        Err(e) => error!("Preprocessing failed: {}", e),
    }

    Ok(())
}
