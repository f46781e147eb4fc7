//! BHD Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the bike-helmet-detection data
//! preparation workspace.
//!
//! # Overview
//!
//! - **Error Handling**: a single wrapped error type that records where it was raised
//! - **Logging**: an explicitly initialized, per-run logging context
//!
//! # Example
//!
//! ```no_run
//! use bhd_common::{BhdError, Result, ResultExt};
//!
//! fn read_status(path: &str) -> Result<String> {
//!     let contents = std::fs::read_to_string(path).context("Failed to read status file")?;
//!     if contents.is_empty() {
//!         return Err(BhdError::new("Status file is empty"));
//!     }
//!     Ok(contents)
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{BhdError, Result, ResultExt};
