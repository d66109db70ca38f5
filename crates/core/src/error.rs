//! Error types for dataset operations.
//!
//! `DatasetError` is the domain taxonomy: every variant renders as the
//! descriptive text a caller receives in place of a result. `TableError`
//! covers the lower-level load/save failures it wraps.

use crate::types::{AnalyzeOperation, DataFormat};

/// Failure while loading or saving a table.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("{0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Columns of differing lengths were combined into one table.
    #[error("column '{column}' has {found} rows, expected {expected}")]
    RaggedColumns {
        column: String,
        found: usize,
        expected: usize,
    },

    /// An array could not be converted to the column's storage type.
    #[error("column '{column}' could not be decoded as {expected}")]
    Decode {
        column: String,
        expected: &'static str,
    },
}

/// Expected failure of a dataset operation, surfaced to callers as text.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// File is missing, or its name does not resolve inside the data directory.
    #[error("Error: File '{filename}' not found in data directory.")]
    NotFound { filename: String },

    /// Filename has no `.csv` / `.parquet` suffix.
    #[error("Error: Filename '{filename}' must end with .csv or .parquet")]
    UnsupportedFormat { filename: String },

    /// File exists but could not be read as the requested format.
    #[error("Error reading {format} file '{filename}': {source}")]
    LoadFailure {
        format: DataFormat,
        filename: String,
        #[source]
        source: TableError,
    },

    /// Table could not be serialized or written.
    #[error("Error creating sample data: {source}")]
    WriteFailure {
        filename: String,
        #[source]
        source: TableError,
    },

    #[error("Unknown operation: {operation}. Available: {available}", available = AnalyzeOperation::available())]
    UnknownOperation { operation: String },
}

impl DatasetError {
    /// Stable tag for logs and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::LoadFailure { .. } => "load_failure",
            Self::WriteFailure { .. } => "write_failure",
            Self::UnknownOperation { .. } => "unknown_operation",
        }
    }

    pub(crate) fn not_found(filename: &str) -> Self {
        Self::NotFound {
            filename: filename.to_string(),
        }
    }
}

/// Result of a dataset operation: rendered text or a domain error.
pub type DatasetResult = Result<String, DatasetError>;
