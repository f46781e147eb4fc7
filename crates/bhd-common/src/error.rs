//! Error types for BHD
//!
//! Every fallible operation in the workspace reports failures as a single
//! [`BhdError`]. The error records the source file and line where it was
//! raised, so no taxonomy of error kinds is exposed to callers: the message
//! text and the origin location are all there is.
//!
//! Locations are captured with `#[track_caller]`, which means both explicit
//! construction (`BhdError::new`) and `?` conversions report the caller's
//! position rather than a line inside this module.

use std::panic::Location;
use thiserror::Error;

/// Result type alias for BHD operations
pub type Result<T> = std::result::Result<T, BhdError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Wrapped error carrying a message and the location it was raised at
#[derive(Error, Debug)]
#[error("Error occurred in script: [ {file} ] at line number: [{line}] error message: [{message}]")]
pub struct BhdError {
    message: String,
    file: &'static str,
    line: u32,
    #[source]
    source: Option<BoxError>,
}

impl BhdError {
    /// Create an error from a message, located at the caller
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::at(Location::caller(), message.into(), None)
    }

    /// Wrap any error, located at the caller
    #[track_caller]
    pub fn wrap<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::at(Location::caller(), err.to_string(), Some(Box::new(err)))
    }

    fn at(location: &'static Location<'static>, message: String, source: Option<BoxError>) -> Self {
        Self {
            message,
            file: location.file(),
            line: location.line(),
            source,
        }
    }

    /// The error message without location decoration
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source file the error was raised in
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Line number the error was raised at
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl From<std::io::Error> for BhdError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::wrap(err)
    }
}

impl From<serde_json::Error> for BhdError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::wrap(err)
    }
}

impl From<toml::de::Error> for BhdError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::wrap(err)
    }
}

/// Attach a message to a foreign error while converting it to [`BhdError`]
pub trait ResultExt<T> {
    /// Wrap the error with a fixed message
    fn context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Wrap the error with a lazily built message
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[track_caller]
    fn context<C: Into<String>>(self, context: C) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(BhdError::at(
                Location::caller(),
                format!("{}: {}", context.into(), err),
                Some(Box::new(err)),
            )),
        }
    }

    #[track_caller]
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(BhdError::at(
                Location::caller(),
                format!("{}: {}", f().into(), err),
                Some(Box::new(err)),
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_new_records_caller_location() {
        let err = BhdError::new("boom");
        let expected_line = line!() - 1;

        assert_eq!(err.message(), "boom");
        assert_eq!(err.line(), expected_line);
        assert!(err.file().ends_with("error.rs"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_display_format() {
        let err = BhdError::new("disk full");
        let rendered = err.to_string();

        assert!(rendered.starts_with("Error occurred in script: [ "));
        assert!(rendered.contains(&format!("at line number: [{}]", err.line())));
        assert!(rendered.ends_with("error message: [disk full]"));
    }

    #[test]
    fn test_question_mark_wraps_io_error() {
        let expected_line = line!() + 2;
        fn open_missing() -> Result<std::fs::File> {
            let file = std::fs::File::open("/definitely/not/a/real/path.zip")?;
            Ok(file)
        }

        let err = open_missing().unwrap_err();
        assert_eq!(err.line(), expected_line);
        assert!(err.file().ends_with("error.rs"));
        assert!(err.source().is_some());
        assert!(!err.message().is_empty());
    }

    #[test]
    fn test_context_prefixes_message_and_keeps_source() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));

        let err = result.context("Failed to create feature store").unwrap_err();
        let expected_line = line!() - 1;

        assert_eq!(err.message(), "Failed to create feature store: denied");
        assert_eq!(err.line(), expected_line);
        assert_eq!(err.source().unwrap().to_string(), "denied");
    }

    #[test]
    fn test_with_context_is_lazy_on_success() {
        let result: std::result::Result<u8, std::io::Error> = Ok(7);
        let value = result
            .with_context(|| -> String { panic!("context built on success") })
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_rewrapping_nests_messages() {
        let inner: Result<()> = Err(BhdError::new("corrupt archive"));
        let err = inner.context("Ingestion failed").unwrap_err();

        assert!(err.message().starts_with("Ingestion failed: Error occurred in script"));
        assert!(err.message().ends_with("error message: [corrupt archive]"));

        let inner = err.source().unwrap().downcast_ref::<BhdError>().unwrap();
        assert_eq!(inner.message(), "corrupt archive");
    }
}
