//! Google Drive share links
//!
//! Share links look like `https://drive.google.com/file/d/<id>/view?usp=sharing`.
//! The file identifier is the path segment before the trailing one, and the
//! file itself is served from `<base>/uc?id=<id>`. Large files are answered
//! with an HTML interstitial ("can't scan this file for viruses") that links
//! to the real download; that page is followed once.

use crate::progress;
use bhd_common::{BhdError, Result, ResultExt};
use futures::StreamExt;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, Url};
use std::io::Write;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Public Drive endpoint
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://drive.google.com";

#[allow(clippy::expect_used)]
static FORM_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<form[^>]*id="download-form"[^>]*action="([^"]+)""#)
        .expect("download form pattern")
});

#[allow(clippy::expect_used)]
static FORM_ACTION_REVERSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<form[^>]*action="([^"]+)"[^>]*id="download-form""#)
        .expect("download form pattern")
});

#[allow(clippy::expect_used)]
static HIDDEN_INPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]*type="hidden"[^>]*name="([^"]+)"[^>]*value="([^"]*)""#)
        .expect("hidden input pattern")
});

#[allow(clippy::expect_used)]
static CONFIRM_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"confirm=([0-9A-Za-z_-]+)").expect("confirm token pattern"));

/// Extract the file identifier from a share link
///
/// The identifier is the segment preceding the last `/`-separated segment.
/// No other validation of the URL is performed.
pub fn file_id_from_url(url: &str) -> Result<String> {
    let mut segments = url.rsplit('/');
    let _trailing = segments.next();

    match segments.next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(BhdError::new(format!("Cannot find a file identifier in URL '{}'", url))),
    }
}

/// Find the follow-up download URL on a Drive interstitial page
///
/// Handles both the form-based page (`<form id="download-form" action=...>`
/// with hidden inputs) and the older `confirm=<token>` link.
pub fn confirmation_url(page: &str, base_url: &str, file_id: &str) -> Result<Option<String>> {
    let action = FORM_ACTION
        .captures(page)
        .or_else(|| FORM_ACTION_REVERSED.captures(page))
        .map(|caps| caps[1].replace("&amp;", "&"));

    if let Some(action) = action {
        let params: Vec<(String, String)> = HIDDEN_INPUT
            .captures_iter(page)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
            .collect();
        let url = Url::parse_with_params(&action, &params)
            .with_context(|| format!("Invalid download form action '{}'", action))?;
        return Ok(Some(url.to_string()));
    }

    Ok(CONFIRM_TOKEN.captures(page).map(|caps| {
        format!(
            "{}/uc?export=download&confirm={}&id={}",
            base_url.trim_end_matches('/'),
            &caps[1],
            file_id
        )
    }))
}

fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("text/html"))
        .unwrap_or(false)
}

/// HTTP client for Drive downloads
#[derive(Debug, Clone)]
pub struct DriveClient {
    base_url: String,
    http: reqwest::Client,
    quiet: bool,
}

impl DriveClient {
    /// Create a client against the public Drive endpoint
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("bhd-ingest/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: DEFAULT_DRIVE_BASE_URL.to_string(),
            http,
            quiet: false,
        })
    }

    /// Point the client at another endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Hide the progress bar
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Direct download URL for a file identifier
    pub fn download_url(&self, file_id: &str) -> String {
        format!("{}/uc?id={}", self.base_url.trim_end_matches('/'), file_id)
    }

    /// Download a file to `dest`, replacing any existing file
    ///
    /// Returns the number of bytes written.
    pub async fn download(&self, file_id: &str, dest: &Path) -> Result<u64> {
        let url = self.download_url(file_id);
        let mut response = self.get(&url).await?;

        if is_html(&response) {
            let page = response
                .text()
                .await
                .context("Failed to read Drive confirmation page")?;
            let confirm_url = confirmation_url(&page, &self.base_url, file_id)?.ok_or_else(|| {
                BhdError::new(format!(
                    "Drive returned a web page instead of file '{}'. Check that the link is shared publicly",
                    file_id
                ))
            })?;

            debug!(url = %confirm_url, "Following Drive confirmation page");
            response = self.get(&confirm_url).await?;

            if is_html(&response) {
                return Err(BhdError::new(format!(
                    "Drive did not serve file '{}' after confirmation",
                    file_id
                )));
            }
        }

        self.write_body(response, dest).await
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        if !response.status().is_success() {
            return Err(BhdError::new(format!(
                "Failed to download {}: {}",
                url,
                response.status()
            )));
        }

        Ok(response)
    }

    async fn write_body(&self, response: Response, dest: &Path) -> Result<u64> {
        let name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dest.display().to_string());
        let pb = progress::create_download_progress(
            response.content_length(),
            &format!("Downloading {}", name),
            self.quiet,
        )?;

        let mut file = std::fs::File::create(dest)
            .with_context(|| format!("Failed to create {}", dest.display()))?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Failed to read download stream")?;
            file.write_all(&chunk)
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            written += chunk.len() as u64;
            pb.set_position(written);
        }
        file.flush()?;

        pb.finish_with_message(progress::finished_message(&name, written));
        info!(bytes = written, path = %dest.display(), "Download finished");

        Ok(written)
    }
}
