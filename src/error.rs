//! Error handling.

use ndarray::ShapeError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{event, Level};

/// FuncTree error type
///
/// This type encapsulates the various errors that may occur while loading inputs and preparing
/// an analysis. The aggregation itself never fails: missing data degrades to empty rows.
#[derive(Debug, Error)]
pub enum FuncTreeError {
    /// Error decoding a delimited measurement table
    #[error("failed to read measurement table")]
    Csv(#[from] csv::Error),

    /// Error reading or decompressing input data
    #[error("failed to read input data")]
    Io(#[from] std::io::Error),

    /// Error (de)serialising JSON
    #[error("invalid JSON document")]
    Json(#[from] serde_json::Error),

    /// Measurement table contains an entry more than once
    #[error("duplicate entry {entry} in measurement table")]
    DuplicateEntry { entry: String },

    /// Measurement table header declares no sample columns
    #[error("measurement table has no data columns")]
    NoColumns,

    /// Measurement table row does not match the header
    #[error("row {line} has {found} fields, expected {expected}")]
    RaggedRow {
        line: u64,
        found: usize,
        expected: usize,
    },

    /// Measurement table cell is not a number
    #[error("invalid value {value:?} for {entry} in column {column}")]
    InvalidValue {
        entry: String,
        column: String,
        value: String,
    },

    /// Incompatible missing data descriptor
    #[error("missing data descriptor is not valid")]
    InvalidMissing(#[source] validator::ValidationError),

    /// Error validating an AnalysisRequest (single error)
    #[error("analysis request is not valid")]
    RequestValidationSingle(#[from] validator::ValidationError),

    /// Error validating an AnalysisRequest (multiple errors)
    #[error("analysis request is not valid")]
    RequestValidation(#[from] validator::ValidationErrors),

    /// Error creating ndarray Array from shape
    #[error("failed to create array from shape")]
    ShapeInvalid(#[from] ShapeError),

    /// Unsupported aggregation method requested
    #[error("unsupported method {method}")]
    UnsupportedMethod { method: String },
}

/// Serialisable description of an error and its causes.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct ErrorReport {
    /// Main error message
    pub message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<Vec<String>>,
}

impl ErrorReport {
    /// Return a new ErrorReport
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    pub fn new<E>(error: &E) -> Self
    where
        E: std::error::Error,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorReport { message, caused_by }
    }

    /// Emit the report as ERROR level events, one per cause.
    pub fn log(&self) {
        event!(Level::ERROR, "{}", self.message);
        for cause in self.caused_by.iter().flatten() {
            event!(Level::ERROR, "Caused by: {}", cause);
        }
    }
}

impl From<&FuncTreeError> for ErrorReport {
    fn from(error: &FuncTreeError) -> Self {
        Self::new(error)
    }
}
