//! Data ingestion: download the dataset archive and extract it into the feature store

use crate::artifact::DataIngestionArtifact;
use crate::config::DataIngestionConfig;
use crate::drive::{self, DriveClient};
use bhd_common::{BhdError, Result, ResultExt};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::ZipArchive;

/// Downloads and unpacks the dataset
pub struct DataIngestion {
    config: DataIngestionConfig,
    client: DriveClient,
}

impl DataIngestion {
    pub fn new(config: DataIngestionConfig) -> Result<Self> {
        Ok(Self::with_client(config, DriveClient::new()?))
    }

    pub fn with_client(config: DataIngestionConfig, client: DriveClient) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &DataIngestionConfig {
        &self.config
    }

    /// Fetch the archive behind the configured share link
    ///
    /// Creates the ingestion directory if needed and overwrites any archive
    /// left by a previous run.
    pub async fn download_data(&self) -> Result<PathBuf> {
        let dataset_url = &self.config.data_download_url;
        let zip_download_dir = &self.config.data_ingestion_dir;

        fs::create_dir_all(zip_download_dir).with_context(|| {
            format!("Failed to create download directory {}", zip_download_dir.display())
        })?;

        let file_id = drive::file_id_from_url(dataset_url)?;
        let zip_file_path = self.config.archive_path();

        info!(
            "Downloading data from {} into file {}",
            dataset_url,
            zip_file_path.display()
        );
        self.client.download(&file_id, &zip_file_path).await?;
        info!("Downloaded data into file {}", zip_file_path.display());

        Ok(zip_file_path)
    }

    /// Extract the archive into the feature store directory
    pub fn extract_zip_file(&self, zip_file_path: &Path) -> Result<PathBuf> {
        let feature_store_path = &self.config.feature_store_file_path;

        let entries = extract_archive(zip_file_path, feature_store_path)?;
        info!(
            "Extracted zip file: {} into dir: {} ({} entries)",
            zip_file_path.display(),
            feature_store_path.display(),
            entries
        );

        Ok(feature_store_path.clone())
    }

    /// Download then extract, producing the ingestion artifact
    pub async fn initiate_data_ingestion(&self) -> Result<DataIngestionArtifact> {
        info!("Entered initiate_data_ingestion method of DataIngestion");

        let data_zip_file_path = self.download_data().await?;
        let feature_store_path = self.extract_zip_file(&data_zip_file_path)?;

        let artifact = DataIngestionArtifact {
            data_zip_file_path,
            feature_store_path,
        };

        info!("Exited initiate_data_ingestion method of DataIngestion");
        info!("Data ingestion artifact: {:?}", artifact);

        Ok(artifact)
    }
}

/// Extract every entry of a zip archive below `dest`
///
/// All entry names are checked before anything is written: an entry that
/// is absolute or climbs out of `dest` with `..` fails the whole
/// extraction. Existing files are overwritten. Returns the number of
/// entries extracted.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create feature store {}", dest.display()))?;

    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Failed to read zip archive {}", archive_path.display()))?;

    let mut targets = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .with_context(|| format!("Failed to read zip entry at index {}", index))?;

        let relative = entry.enclosed_name().map(|name| name.to_path_buf()).ok_or_else(|| {
            BhdError::new(format!(
                "Refusing to extract '{}': entry escapes {}",
                entry.name(),
                dest.display()
            ))
        })?;
        targets.push(relative);
    }

    for (index, relative) in targets.iter().enumerate() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("Failed to read zip entry at index {}", index))?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)
                .with_context(|| format!("Failed to create {}", out_path.display()))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut out = File::create(&out_path)
            .with_context(|| format!("Failed to create {}", out_path.display()))?;
        let bytes = std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to extract {}", entry.name()))?;
        debug!("Extracted {} ({} bytes)", out_path.display(), bytes);
    }

    Ok(targets.len())
}
