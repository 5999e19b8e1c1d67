// ==========================================
// Panel Load Engineering - import module error types
// ==========================================
// Tooling: thiserror derive
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Import module error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== file errors =====
    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    #[error("file contains no data rows")]
    EmptyFile,

    // ===== mapping errors =====
    #[error("required field not mapped: {0}")]
    MissingRequiredMapping(String),

    #[error("unknown import field: {0}")]
    UnknownField(String),

    #[error("type conversion failed (row {row}, field {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    // ===== pipeline stage errors =====
    #[error("import step out of order: expected {expected}, currently {actual}")]
    StepOutOfOrder { expected: String, actual: String },

    // ===== commit errors =====
    #[error("no target voltage table selected")]
    NoTargetTable,

    #[error("no eligible rows to import (matched or manual required)")]
    NoEligibleRows,

    // ===== passthrough =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result type alias
pub type ImportResult<T> = Result<T, ImportError>;
