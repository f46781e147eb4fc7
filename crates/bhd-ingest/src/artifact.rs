//! Records handed from one pipeline stage to the next

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output of the ingestion stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    /// Downloaded archive
    pub data_zip_file_path: PathBuf,

    /// Directory the archive was extracted into
    pub feature_store_path: PathBuf,
}

/// Output of the validation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataValidationArtifact {
    pub validation_status: bool,
}

/// Artifacts of a complete pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub data_ingestion: DataIngestionArtifact,
    pub data_validation: DataValidationArtifact,
}
