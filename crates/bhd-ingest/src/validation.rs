//! Data validation: check the feature store holds every required entry

use crate::artifact::{DataIngestionArtifact, DataValidationArtifact};
use crate::config::DataValidationConfig;
use bhd_common::{BhdError, Result, ResultExt};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Render the status report line, e.g. `Validation status: True`
pub fn status_line(status: bool) -> String {
    format!("Validation status: {}", if status { "True" } else { "False" })
}

/// Names directly under `dir`; subdirectories are not descended into
pub fn list_top_level(dir: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to list feature store {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to list feature store {}", dir.display()))?;
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }

    Ok(names)
}

/// Required names absent from `present`, sorted
pub fn missing_files<S: AsRef<str>>(present: &HashSet<String>, required: &[S]) -> BTreeSet<String> {
    required
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !present.contains(*name))
        .map(str::to_string)
        .collect()
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Validates the output of the ingestion stage
pub struct DataValidation {
    data_ingestion_artifact: DataIngestionArtifact,
    data_validation_config: DataValidationConfig,
}

impl DataValidation {
    pub fn new(
        data_ingestion_artifact: DataIngestionArtifact,
        data_validation_config: DataValidationConfig,
    ) -> Self {
        Self {
            data_ingestion_artifact,
            data_validation_config,
        }
    }

    /// Check that every required name exists at the top of the feature store
    ///
    /// Extra entries are ignored. The outcome is written to the status file,
    /// replacing any previous report.
    pub fn validate_all_files_exist(&self) -> Result<bool> {
        let present = list_top_level(&self.data_ingestion_artifact.feature_store_path)?;
        let missing = missing_files(
            &present,
            self.data_validation_config.required_file_list.as_slice(),
        );

        let validation_status = missing.is_empty();
        if !validation_status {
            warn!("Missing files: {:?}", missing);
        }

        let config = &self.data_validation_config;
        fs::create_dir_all(&config.data_validation_dir).with_context(|| {
            format!(
                "Failed to create validation directory {}",
                config.data_validation_dir.display()
            )
        })?;
        fs::write(&config.valid_status_file_dir, status_line(validation_status)).with_context(
            || {
                format!(
                    "Failed to write status file {}",
                    config.valid_status_file_dir.display()
                )
            },
        )?;

        Ok(validation_status)
    }

    /// Run the check and, when it passes, copy the archive into the working directory
    pub fn initiate_data_validation(&self) -> Result<DataValidationArtifact> {
        info!("Starting data validation process");

        let validation_status = self.validate_all_files_exist()?;
        let artifact = DataValidationArtifact { validation_status };

        info!("Data validation completed with status: {}", validation_status);
        info!("Data validation artifact: {:?}", artifact);

        if validation_status {
            let target = self.copy_archive_to_working_dir()?;
            info!("Copied data zip file to {}", target.display());
        }

        Ok(artifact)
    }

    fn copy_archive_to_working_dir(&self) -> Result<std::path::PathBuf> {
        let archive = &self.data_ingestion_artifact.data_zip_file_path;
        let file_name = archive.file_name().ok_or_else(|| {
            BhdError::new(format!("Archive path {} has no file name", archive.display()))
        })?;

        let cwd = std::env::current_dir().context("Failed to resolve the working directory")?;
        let target = cwd.join(file_name);

        // Copying a file onto itself truncates it
        if is_same_file(archive, &target) {
            info!("Archive {} is already in the working directory", archive.display());
            return Ok(target);
        }

        fs::copy(archive, &target).with_context(|| {
            format!("Failed to copy {} to {}", archive.display(), target.display())
        })?;

        Ok(target)
    }
}
