//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bike-helmet detection data preparation
#[derive(Parser, Debug)]
#[command(name = "bhd-ingest")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Pipeline configuration file (TOML)
    #[arg(short, long, env = "BHD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug level, logs echoed to the console)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print artifacts as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Hide the download progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Drive endpoint serving the archive
    #[arg(long, env = "BHD_DRIVE_BASE_URL", global = true, hide = true)]
    pub drive_base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download, extract and validate the dataset
    Run,

    /// Download and extract the dataset only
    Ingest {
        /// Drive share link (overrides the configuration)
        #[arg(long)]
        url: Option<String>,
    },

    /// Validate an already extracted feature store
    Validate {
        /// Directory holding the extracted dataset
        #[arg(long)]
        feature_store: PathBuf,

        /// Archive to stage in the working directory on success
        #[arg(long)]
        archive: PathBuf,
    },
}
