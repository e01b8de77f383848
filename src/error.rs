//! Typed errors raised by column resolution and classifier setup.
//!
//! I/O and parsing failures travel as `anyhow::Error` with context, like the
//! rest of the crate. The two enums here are the failures callers are
//! expected to match on: a [`ConfigurationError`] means the classifier was
//! set up wrong, a [`ColumnMappingError`] means a spreadsheet could not be
//! mapped and the user can fix it by supplying an explicit mapping.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("classifier training data must not be empty")]
    EmptyTrainingData,
    #[error("field '{0}' has no training examples")]
    NoExamples(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnMappingError {
    #[error("column '{column}' mapped to field '{field}' does not exist in the file")]
    InvalidColumn { field: String, column: String },
    #[error(
        "unable to locate the column for field '{field}'; supply an explicit column mapping or rename the header"
    )]
    Unresolved { field: String },
    #[error("column '{column}' for field '{field}' is already assigned to field '{assigned_to}'")]
    ColumnReused {
        field: String,
        column: String,
        assigned_to: String,
    },
    #[error("unknown field '{0}' (expected one of: {fields})", fields = crate::fields::CanonicalField::names().join(", "))]
    UnknownField(String),
    #[error("column for field '{field}' has a value that cannot be converted at row {row}: '{value}'")]
    NotConvertible {
        field: String,
        row: usize,
        value: String,
    },
}

impl ColumnMappingError {
    /// Name of the canonical field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidColumn { field, .. }
            | Self::Unresolved { field }
            | Self::ColumnReused { field, .. }
            | Self::NotConvertible { field, .. } => field,
            Self::UnknownField(name) => name,
        }
    }
}
