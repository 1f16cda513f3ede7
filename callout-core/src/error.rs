//! Error types for extraction
//!
//! Format-level failures surface as [`ExtractError`]. Per-entity failures are
//! [`ResolveError`]s and never leave the extractor: they are turned into
//! diagnostics so the rest of the batch still comes through.

use thiserror::Error;

/// Failure to resolve one entity's attributes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The entity carries no `attributes` mapping at all
    #[error("entity has no attribute mapping")]
    MissingAttributes,

    /// A field exists but is not a mapping of variant keys
    #[error("field '{field}' is not a mapping of variant keys")]
    MalformedField { field: String },
}

/// Failure to read an uploaded document at all
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes are not valid JSON
    #[error("Error parsing JSON file.")]
    Json(#[from] serde_json::Error),

    /// The workbook could not be opened or a sheet could not be read
    #[error("Error reading workbook: {message}")]
    Workbook { message: String },

    /// The workbook has no sheet to read callouts from
    #[error("Workbook has no sheet named '{name}'")]
    MissingSheet { name: String },

    /// Neither the extension nor the content identifies a supported format
    #[error("Unsupported file format: {hint}")]
    UnknownFormat { hint: String },
}

impl From<calamine::Error> for ExtractError {
    fn from(err: calamine::Error) -> Self {
        Self::Workbook { message: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
