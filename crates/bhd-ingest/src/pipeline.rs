//! Training pipeline orchestration
//!
//! Runs the data preparation stages in order: ingestion, then validation.
//! Any stage error aborts the run.

use crate::artifact::{DataIngestionArtifact, DataValidationArtifact, PipelineOutcome};
use crate::config::PipelineConfig;
use crate::drive::DriveClient;
use crate::ingestion::DataIngestion;
use crate::validation::DataValidation;
use bhd_common::Result;
use tracing::info;

pub struct TrainingPipeline {
    config: PipelineConfig,
    client: Option<DriveClient>,
}

impl TrainingPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Use a preconfigured Drive client for the ingestion stage
    pub fn with_client(mut self, client: DriveClient) -> Self {
        self.client = Some(client);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub async fn start_data_ingestion(&self) -> Result<DataIngestionArtifact> {
        info!("Entered start_data_ingestion of TrainingPipeline");

        let config = self.config.data_ingestion.clone();
        config.validate()?;

        let ingestion = match &self.client {
            Some(client) => DataIngestion::with_client(config, client.clone()),
            None => DataIngestion::new(config)?,
        };
        let artifact = ingestion.initiate_data_ingestion().await?;

        info!("Got the data from the drive link");
        Ok(artifact)
    }

    pub fn start_data_validation(
        &self,
        data_ingestion_artifact: &DataIngestionArtifact,
    ) -> Result<DataValidationArtifact> {
        info!("Entered start_data_validation of TrainingPipeline");

        let validation = DataValidation::new(
            data_ingestion_artifact.clone(),
            self.config.data_validation.clone(),
        );
        let artifact = validation.initiate_data_validation()?;

        info!("Performed the data validation operation");
        Ok(artifact)
    }

    /// Run every stage in sequence
    pub async fn run_pipeline(&self) -> Result<PipelineOutcome> {
        let data_ingestion = self.start_data_ingestion().await?;
        let data_validation = self.start_data_validation(&data_ingestion)?;

        Ok(PipelineOutcome {
            data_ingestion,
            data_validation,
        })
    }
}
