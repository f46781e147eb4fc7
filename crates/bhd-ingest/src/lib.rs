//! BHD Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Data preparation for the bike-helmet detection training pipeline.
//!
//! # Stages
//!
//! - **Ingestion**: download the dataset archive from a Drive share link and
//!   extract it into the feature store
//! - **Validation**: check the feature store for the required entries, write
//!   a status report and stage the archive in the working directory
//!
//! # Example
//!
//! ```no_run
//! use bhd_ingest::config::PipelineConfig;
//! use bhd_ingest::pipeline::TrainingPipeline;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> bhd_common::Result<()> {
//!     let config = PipelineConfig::load(None)?;
//!     let outcome = TrainingPipeline::new(config).run_pipeline().await?;
//!     println!("valid: {}", outcome.data_validation.validation_status);
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod drive;
pub mod ingestion;
pub mod pipeline;
pub mod progress;
pub mod validation;

pub use artifact::{DataIngestionArtifact, DataValidationArtifact, PipelineOutcome};
pub use cli::{Cli, Command};
