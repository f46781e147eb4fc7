//! Pipeline configuration entities
//!
//! Paths and settings consumed by the ingestion and validation components.
//! Values are resolved in order: built-in defaults derived from the
//! artifacts directory, an optional TOML file, then environment variables.
//! Components trust the resolved values.

use bhd_common::{BhdError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// Pipeline Constants
// ============================================================================

/// Root directory for every artifact the pipeline produces.
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// Ingestion stage directory, relative to the artifacts directory.
pub const DATA_INGESTION_DIR_NAME: &str = "data_ingestion";

/// Feature store directory, relative to the ingestion directory.
pub const DATA_INGESTION_FEATURE_STORE_DIR: &str = "feature_store";

/// File name the downloaded archive is stored under.
pub const DATA_DOWNLOAD_FILE_NAME: &str = "data.zip";

/// Validation stage directory, relative to the artifacts directory.
pub const DATA_VALIDATION_DIR_NAME: &str = "data_validation";

/// Status report file name, relative to the validation directory.
pub const DATA_VALIDATION_STATUS_FILE: &str = "status.txt";

/// Entries that must be present at the top level of the feature store.
pub const DATA_VALIDATION_ALL_REQUIRED_FILES: &[&str] = &["train", "valid", "data.yaml"];

pub const ENV_ARTIFACTS_DIR: &str = "BHD_ARTIFACTS_DIR";
pub const ENV_DATA_URL: &str = "BHD_DATA_URL";
pub const ENV_REQUIRED_FILES: &str = "BHD_REQUIRED_FILES";

/// Top-level pipeline settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingPipelineConfig {
    pub artifacts_dir: PathBuf,
}

impl Default for TrainingPipelineConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

/// Settings for the ingestion component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataIngestionConfig {
    /// Directory the archive is downloaded into
    pub data_ingestion_dir: PathBuf,

    /// Directory the archive is extracted into
    pub feature_store_file_path: PathBuf,

    /// Drive share link of the dataset archive
    pub data_download_url: String,
}

impl DataIngestionConfig {
    pub fn new(pipeline: &TrainingPipelineConfig, data_download_url: impl Into<String>) -> Self {
        let data_ingestion_dir = pipeline.artifacts_dir.join(DATA_INGESTION_DIR_NAME);
        Self {
            feature_store_file_path: data_ingestion_dir.join(DATA_INGESTION_FEATURE_STORE_DIR),
            data_ingestion_dir,
            data_download_url: data_download_url.into(),
        }
    }

    /// Local path of the downloaded archive
    pub fn archive_path(&self) -> PathBuf {
        self.data_ingestion_dir.join(DATA_DOWNLOAD_FILE_NAME)
    }

    /// Ingestion cannot run without a source link
    pub fn validate(&self) -> Result<()> {
        if self.data_download_url.trim().is_empty() {
            return Err(BhdError::new(format!(
                "Data download URL is not configured. Set {} or data_ingestion.data_download_url",
                ENV_DATA_URL
            )));
        }
        Ok(())
    }
}

/// Settings for the validation component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataValidationConfig {
    /// Directory holding the status report
    pub data_validation_dir: PathBuf,

    /// Status report file
    pub valid_status_file_dir: PathBuf,

    /// Names that must exist directly under the feature store
    pub required_file_list: Vec<String>,
}

impl DataValidationConfig {
    pub fn new(pipeline: &TrainingPipelineConfig) -> Self {
        let data_validation_dir = pipeline.artifacts_dir.join(DATA_VALIDATION_DIR_NAME);
        Self {
            valid_status_file_dir: data_validation_dir.join(DATA_VALIDATION_STATUS_FILE),
            data_validation_dir,
            required_file_list: DATA_VALIDATION_ALL_REQUIRED_FILES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.valid_status_file_dir.starts_with(&self.data_validation_dir) {
            return Err(BhdError::new(format!(
                "Status file {} must be inside the validation directory {}",
                self.valid_status_file_dir.display(),
                self.data_validation_dir.display()
            )));
        }
        Ok(())
    }
}

/// Complete configuration for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub training: TrainingPipelineConfig,
    pub data_ingestion: DataIngestionConfig,
    pub data_validation: DataValidationConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let training = TrainingPipelineConfig::default();
        Self {
            data_ingestion: DataIngestionConfig::new(&training, ""),
            data_validation: DataValidationConfig::new(&training),
            training,
        }
    }
}

/// On-disk representation; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    artifacts_dir: Option<PathBuf>,
    data_ingestion: IngestionSection,
    data_validation: ValidationSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct IngestionSection {
    data_download_url: Option<String>,
    data_ingestion_dir: Option<PathBuf>,
    feature_store_file_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ValidationSection {
    data_validation_dir: Option<PathBuf>,
    valid_status_file_dir: Option<PathBuf>,
    required_file_list: Option<Vec<String>>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

impl PipelineConfig {
    /// Load configuration from `.env`, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };

        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Parse a TOML document without touching the environment
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Self::resolve(file, |_| None)
    }

    fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let artifacts_dir = env(ENV_ARTIFACTS_DIR)
            .map(PathBuf::from)
            .or(file.artifacts_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));
        let training = TrainingPipelineConfig { artifacts_dir };

        let mut data_ingestion = DataIngestionConfig::new(&training, "");
        if let Some(url) = env(ENV_DATA_URL).or(file.data_ingestion.data_download_url) {
            data_ingestion.data_download_url = url;
        }
        if let Some(dir) = file.data_ingestion.data_ingestion_dir {
            data_ingestion.data_ingestion_dir = dir;
        }
        if let Some(dir) = file.data_ingestion.feature_store_file_path {
            data_ingestion.feature_store_file_path = dir;
        }

        let mut data_validation = DataValidationConfig::new(&training);
        if let Some(dir) = file.data_validation.data_validation_dir {
            data_validation.valid_status_file_dir = dir.join(DATA_VALIDATION_STATUS_FILE);
            data_validation.data_validation_dir = dir;
        }
        if let Some(status_file) = file.data_validation.valid_status_file_dir {
            data_validation.valid_status_file_dir = status_file;
        }
        if let Some(list) = env(ENV_REQUIRED_FILES).map(|raw| split_list(&raw)) {
            data_validation.required_file_list = list;
        } else if let Some(list) = file.data_validation.required_file_list {
            data_validation.required_file_list = list;
        }

        let config = Self {
            training,
            data_ingestion,
            data_validation,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.data_validation.validate()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
