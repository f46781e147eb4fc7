//! BHD Ingest - dataset preparation tool

use bhd_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use bhd_common::Result;
use bhd_ingest::config::PipelineConfig;
use bhd_ingest::drive::DriveClient;
use bhd_ingest::ingestion::DataIngestion;
use bhd_ingest::pipeline::TrainingPipeline;
use bhd_ingest::validation::{status_line, DataValidation};
use bhd_ingest::{Cli, Command, DataIngestionArtifact};
use clap::Parser;
use std::process;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let log_config = if cli.verbose {
        LogConfig::builder()
            .level(LogLevel::Debug)
            .output(LogOutput::Both)
            .app_name("bhd-ingest")
            .build()
    } else {
        LogConfig::builder()
            .level(LogLevel::Info)
            .output(LogOutput::File)
            .app_name("bhd-ingest")
            .build()
    };

    // Environment variables take precedence
    let log_config = match log_config.merge_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        },
    };

    // The pipeline still runs when the log directory is unusable
    let guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        },
    };

    let code = match execute_command(&cli).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            1
        },
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(code);
}

/// Execute the CLI command, returning whether the data is usable
async fn execute_command(cli: &Cli) -> Result<bool> {
    let config = PipelineConfig::load(cli.config.as_deref())?;
    info!(command = ?cli.command, "Loaded pipeline configuration");

    match &cli.command {
        Command::Run => {
            let pipeline = TrainingPipeline::new(config).with_client(drive_client(cli)?);
            let outcome = pipeline.run_pipeline().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print_ingestion(&outcome.data_ingestion);
                println!("{}", status_line(outcome.data_validation.validation_status));
            }
            Ok(outcome.data_validation.validation_status)
        },

        Command::Ingest { url } => {
            let mut ingestion_config = config.data_ingestion;
            if let Some(url) = url {
                ingestion_config.data_download_url = url.clone();
            }
            ingestion_config.validate()?;

            let ingestion = DataIngestion::with_client(ingestion_config, drive_client(cli)?);
            let artifact = ingestion.initiate_data_ingestion().await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            } else {
                print_ingestion(&artifact);
            }
            Ok(true)
        },

        Command::Validate {
            feature_store,
            archive,
        } => {
            let ingestion_artifact = DataIngestionArtifact {
                data_zip_file_path: archive.clone(),
                feature_store_path: feature_store.clone(),
            };
            let validation = DataValidation::new(ingestion_artifact, config.data_validation);
            let artifact = validation.initiate_data_validation()?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            } else {
                println!("{}", status_line(artifact.validation_status));
            }
            Ok(artifact.validation_status)
        },
    }
}

fn drive_client(cli: &Cli) -> Result<DriveClient> {
    let client = DriveClient::new()?.quiet(cli.quiet);
    Ok(match &cli.drive_base_url {
        Some(base_url) => client.with_base_url(base_url.clone()),
        None => client,
    })
}

fn print_ingestion(artifact: &DataIngestionArtifact) {
    println!("Archive: {}", artifact.data_zip_file_path.display());
    println!("Feature store: {}", artifact.feature_store_path.display());
}
