//! Error handling for the surveillance engine.
//!
//! Only failures the caller has to act on surface as errors: a missing
//! required column, unreadable input files and invalid configuration.
//! Data-quality problems inside individual rows never reach this type.

use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Specialized error type for the surveillance engine
#[derive(Debug, thiserror::Error)]
pub enum SurveillanceError {
    /// A column the dataset cannot be built without is absent
    #[error("Required column '{column}' not found in input data")]
    MissingColumn {
        /// Exact name of the missing column
        column: String,
    },

    /// Error processing Arrow data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error opening or reading a file
    #[error("IO error for {}: {source}", path.display())]
    Io {
        /// The file that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Invalid engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid query or command argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl SurveillanceError {
    /// Create a missing column error
    #[must_use]
    pub fn missing_column(column: &str) -> Self {
        Self::MissingColumn {
            column: column.to_string(),
        }
    }

    /// Wrap an IO error together with the path it occurred on
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for surveillance engine operations
pub type Result<T> = std::result::Result<T, SurveillanceError>;
