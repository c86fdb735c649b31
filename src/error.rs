//! Error handling for tabstore
//!
//! This module defines the error taxonomy shared by every table operation.
//! Errors fall into a few groups callers care about: a missing table,
//! a validation failure (uniqueness, undeclared column, malformed record),
//! a numeric parse failure, and storage failures from the record files.
//!
//! The module uses thiserror to keep the variants and their messages together.

use std::num::ParseIntError;

use thiserror::Error;

/// TabError represents all possible errors raised by the store
#[derive(Error, Debug)]
pub enum TabError {
    /// Error during file system operations (reading/writing record files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while reading or writing delimited record data
    #[error("Record file error: {0}")]
    Csv(#[from] csv::Error),

    /// A referenced table is not registered
    #[error("Table '{0}' does not exist")]
    TableNotFound(String),

    /// An insert would duplicate an existing row's uniqueness key
    #[error("Table '{table}': the key ({key}) must be unique")]
    UniqueViolation { table: String, key: String },

    /// A column is not part of the table's declared schema
    #[error("There is no column '{column}' in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// A raw record has the wrong number of fields (strict mode only)
    #[error("Record has {found} fields, expected {expected}")]
    MalformedRecord { expected: usize, found: usize },

    /// A value could not be read as an integer
    #[error("Column '{column}': cannot parse '{value}' as an integer: {source}")]
    NumericParse {
        column: String,
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// Selection criteria do not fit the table
    #[error("Table '{table}': {reason}")]
    InvalidCriteria { table: String, reason: String },

    /// Join arguments are inconsistent
    #[error("Invalid join: {0}")]
    InvalidJoin(String),

    /// A table layout cannot be used (for example an empty uniqueness key)
    #[error("Invalid layout for table '{table}': {reason}")]
    InvalidLayout { table: String, reason: String },
}

impl TabError {
    /// True when the error refers to an unregistered table
    pub fn is_not_found(&self) -> bool {
        matches!(self, TabError::TableNotFound(_))
    }

    /// True for uniqueness, undeclared-column and malformed-record failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TabError::UniqueViolation { .. }
                | TabError::ColumnNotFound { .. }
                | TabError::MalformedRecord { .. }
        )
    }
}

/// Result type alias for operations that can produce a TabError
pub type TabResult<T> = std::result::Result<T, TabError>;

/// Parse a stored value as an integer, tolerating surrounding whitespace
pub(crate) fn parse_int(column: &str, value: &str) -> TabResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|source| TabError::NumericParse {
            column: column.to_string(),
            value: value.to_string(),
            source,
        })
}
