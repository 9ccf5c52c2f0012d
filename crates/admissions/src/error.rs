//! Error types for the admissions library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for admissions operations.
#[derive(Debug, Error)]
pub enum AdmissionsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error in a classification rule.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Empty file or no records to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A field was requested that is not in the field catalog.
    #[error("Invalid field '{field}': expected one of {expected}")]
    InvalidField { field: String, expected: String },

    /// A catalog field is not present in the record set.
    #[error("Field '{0}' is not present in the record set")]
    MissingField(String),

    /// More fields were selected than a tabulation can use.
    #[error("Too many fields selected: {selected} (at most {max})")]
    TooManyFields { selected: usize, max: usize },

    /// No field was selected for tabulation.
    #[error("At least one field must be selected")]
    EmptySelection,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing exported tables or records.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl AdmissionsError {
    /// Build an `InvalidField` error listing the accepted field names.
    pub fn invalid_field<'a>(
        field: impl Into<String>,
        expected: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        AdmissionsError::InvalidField {
            field: field.into(),
            expected: expected.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Result type alias for admissions operations.
pub type Result<T> = std::result::Result<T, AdmissionsError>;
