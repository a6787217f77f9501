//! Error types for the hassy library.
//!
//! All fallible operations return [`HassyError`] through the crate-wide
//! [`Result`] alias. The variants follow the failure classes of the
//! normalization core: data problems at startup versus on a later reload,
//! rejected input, configuration mistakes and broken internal invariants.
//!
//! # Examples
//!
//! ```
//! use hassy::error::{HassyError, Result};
//!
//! fn check(text: &str) -> Result<()> {
//!     if text.is_empty() {
//!         return Err(HassyError::validation("text must not be empty"));
//!     }
//!     Ok(())
//! }
//!
//! match check("") {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for hassy operations.
#[derive(Error, Debug)]
pub enum HassyError {
    /// I/O errors (reading data files, input text, output files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Data source could not be loaded at startup; there is no snapshot to serve.
    #[error("Data load error: {0}")]
    DataLoad(String),

    /// Data source failed to reload; the previous snapshot stays in service.
    #[error("Data reload error: {0}")]
    DataReload(String),

    /// Input text rejected before any processing.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An internal invariant did not hold (e.g. lossless tokenization).
    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with HassyError.
pub type Result<T> = std::result::Result<T, HassyError>;

impl HassyError {
    /// Create a new startup data load error.
    pub fn data_load<S: Into<String>>(msg: S) -> Self {
        HassyError::DataLoad(msg.into())
    }

    /// Create a new data reload error.
    pub fn data_reload<S: Into<String>>(msg: S) -> Self {
        HassyError::DataReload(msg.into())
    }

    /// Create a new input validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        HassyError::Validation(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        HassyError::Config(msg.into())
    }

    /// Create a new internal invariant error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        HassyError::InternalInvariant(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        HassyError::Other(msg.into())
    }

    /// Turn a startup load error into its reload counterpart.
    ///
    /// Parsing code reports every malformed source as `DataLoad`; the store
    /// relabels it when the failure happens on an already-running service.
    pub fn into_reload(self) -> Self {
        match self {
            HassyError::DataLoad(msg) => HassyError::DataReload(msg),
            HassyError::Io(e) => HassyError::DataReload(e.to_string()),
            HassyError::Json(e) => HassyError::DataReload(e.to_string()),
            other => other,
        }
    }

    /// Whether this error is caused by the caller's input or settings.
    pub fn is_user_error(&self) -> bool {
        matches!(self, HassyError::Validation(_) | HassyError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = HassyError::validation("text is empty");
        assert_eq!(error.to_string(), "Validation error: text is empty");

        let error = HassyError::data_load("line 3: missing field");
        assert_eq!(error.to_string(), "Data load error: line 3: missing field");

        let error = HassyError::internal("tokens do not reassemble");
        assert_eq!(
            error.to_string(),
            "Internal invariant violated: tokens do not reassemble"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let hassy_error = HassyError::from(io_error);

        match hassy_error {
            HassyError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_into_reload() {
        let error = HassyError::data_load("bad record").into_reload();
        assert!(matches!(error, HassyError::DataReload(ref m) if m == "bad record"));

        let io_error = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            HassyError::from(io_error).into_reload(),
            HassyError::DataReload(_)
        ));

        assert!(HassyError::validation("x").is_user_error());
        // Non-data errors pass through unchanged.
        assert!(HassyError::validation("x").into_reload().is_user_error());
    }

    #[test]
    fn test_user_errors() {
        assert!(HassyError::validation("text is empty").is_user_error());
        assert!(HassyError::invalid_config("cache_shards must be greater than 0").is_user_error());
        assert!(!HassyError::data_load("bad record").is_user_error());
        assert!(!HassyError::internal("lossy tokenizer").is_user_error());
    }
}
