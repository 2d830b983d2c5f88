//! iocompare - HDF5 vs ADIOS 2 write/read latency
//!
//! Generates one dense grid of 32-bit integers and times a write and a read
//! of it through each storage backend, in a fixed sequential order.

use std::path::PathBuf;

pub mod backend;
pub mod bench;
pub mod config;
pub mod io;
pub mod logging;
pub mod models;
pub mod util;

use models::Operation;

/// Common error type
#[derive(Debug, thiserror::Error)]
pub enum IoCompareError {
    /// Output could not be created, opened, written or closed
    #[error("{backend}: resource error: {message}")]
    Resource { backend: String, message: String },

    /// File, dataset, variable or step is absent
    #[error("{backend}: {what} not found in {}", .path.display())]
    NotFound {
        backend: String,
        what: String,
        path: PathBuf,
    },

    /// Stored shape or element type disagrees with the expected one
    #[error("{backend}: shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        backend: String,
        expected: String,
        found: String,
    },

    /// Session, I/O context, variable or engine setup failed
    #[error("{backend}: initialization failed: {message}")]
    BackendInit { backend: String, message: String },

    /// Backend was compiled out
    #[error("{backend} backend not available (build with `--features {feature}`)")]
    BackendUnavailable {
        backend: String,
        feature: &'static str,
    },

    /// Data read back differs from the data written
    #[error("{backend}: read back {found} at element {index}, wrote {expected}")]
    Verification {
        backend: String,
        index: usize,
        expected: i32,
        found: i32,
    },

    /// Configuration validation or parsing error
    #[error("configuration error: {0}")]
    Config(String),

    /// A timed operation failed
    #[error("{backend} {operation} failed: {source}")]
    Operation {
        operation: Operation,
        backend: String,
        #[source]
        source: Box<IoCompareError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoCompareError {
    /// Innermost error, skipping operation context.
    pub fn root_cause(&self) -> &IoCompareError {
        match self {
            IoCompareError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn resource(backend: &str, message: impl Into<String>) -> Self {
        IoCompareError::Resource {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub fn backend_init(backend: &str, message: impl Into<String>) -> Self {
        IoCompareError::BackendInit {
            backend: backend.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(backend: &str, what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        IoCompareError::NotFound {
            backend: backend.to_string(),
            what: what.into(),
            path: path.into(),
        }
    }
}

impl From<toml::de::Error> for IoCompareError {
    fn from(err: toml::de::Error) -> Self {
        IoCompareError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for IoCompareError {
    fn from(err: toml::ser::Error) -> Self {
        IoCompareError::Config(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for iocompare operations
pub type Result<T> = std::result::Result<T, IoCompareError>;

/// Error reporting helpers
pub mod error {
    use super::IoCompareError;

    /// Convert error to user-friendly message with a suggestion
    pub fn user_friendly_message(error: &IoCompareError) -> String {
        match error.root_cause() {
            IoCompareError::Resource { .. } => format!(
                "{}. Check that the output directory is writable and has free space.",
                error
            ),
            IoCompareError::NotFound { .. } => format!(
                "{}. The file may not have been written by this backend.",
                error
            ),
            IoCompareError::ShapeMismatch { .. } => format!(
                "{}. The file was written with different dimensions or element type.",
                error
            ),
            IoCompareError::BackendInit { .. } => format!(
                "{}. Check the library installation and its runtime configuration.",
                error
            ),
            IoCompareError::Config(msg) => {
                format!("Configuration error: {}. Check your settings.", msg)
            }
            _ => error.to_string(),
        }
    }

    /// Whether the error comes from the storage libraries rather than the harness.
    pub fn is_backend_error(error: &IoCompareError) -> bool {
        matches!(
            error.root_cause(),
            IoCompareError::Resource { .. }
                | IoCompareError::NotFound { .. }
                | IoCompareError::ShapeMismatch { .. }
                | IoCompareError::BackendInit { .. }
        )
    }
}

pub const APP_NAME: &str = "iocompare";
pub const CONFIG_FILE: &str = "iocompare.toml";
pub const DEFAULT_BASENAME: &str = "data_comparison";
pub const DEFAULT_ROWS: usize = 1000;
pub const DEFAULT_COLS: usize = 1000;
/// Generated values lie in `[0, VALUE_UPPER_BOUND)`.
pub const VALUE_UPPER_BOUND: i32 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_operation_context() {
        let inner = IoCompareError::resource("HDF5", "disk full");
        let err = IoCompareError::Operation {
            operation: Operation::Write,
            backend: "HDF5".to_string(),
            source: Box::new(inner),
        };

        assert!(matches!(err.root_cause(), IoCompareError::Resource { .. }));
        let msg = err.to_string();
        assert!(msg.contains("HDF5 write failed"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_user_friendly_message() {
        let err = IoCompareError::resource("ADIOS 2", "cannot open engine");
        let msg = error::user_friendly_message(&err);
        assert!(msg.contains("writable"));

        let err = IoCompareError::Config("rows must be greater than 0".into());
        assert!(error::user_friendly_message(&err).contains("Check your settings"));
    }

    #[test]
    fn test_is_backend_error() {
        assert!(error::is_backend_error(&IoCompareError::backend_init(
            "ADIOS 2", "no session"
        )));
        assert!(!error::is_backend_error(&IoCompareError::Config(
            "bad".into()
        )));
    }

    #[test]
    fn test_not_found_display() {
        let err = IoCompareError::not_found("HDF5", "dataset 'dataset'", "/tmp/x.h5");
        assert_eq!(
            err.to_string(),
            "HDF5: dataset 'dataset' not found in /tmp/x.h5"
        );
    }
}
