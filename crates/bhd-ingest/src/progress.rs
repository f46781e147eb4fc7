//! Progress indicators for archive downloads

use bhd_common::{Result, ResultExt};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

/// Create a progress bar for a download
///
/// When the server does not report a size the bar becomes a byte-counting
/// spinner. `quiet` yields a hidden bar so callers can report progress
/// unconditionally.
pub fn create_download_progress(size: Option<u64>, message: &str, quiet: bool) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let pb = match size {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .context("Invalid progress bar template")?
                    .progress_chars("#>-"),
            );
            pb
        },
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{msg}\n{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})")
                    .context("Invalid spinner template")?,
            );
            pb
        },
    };
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Closing message for a finished download, e.g. `Downloaded data.zip (1.50 KiB)`
pub fn finished_message(name: &str, written: u64) -> String {
    format!("Downloaded {} ({})", name, HumanBytes(written))
}
