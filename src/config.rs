//! Configuration module for tabstore
//!
//! This module provides the settings shared by every table opened from a data
//! directory. The configuration is built once by the caller and passed down,
//! rather than living in global state.

use std::path::{Path, PathBuf};

/// Store configuration
///
/// Created at startup and handed to `Table::open` and the command-line driver.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the record files
    data_dir: PathBuf,

    /// Separator used to split raw records on insert
    field_separator: String,

    /// Reject raw records whose field count differs from the schema
    strict_records: bool,

    /// Whether to show verbose output
    verbose: bool,
}

impl StoreConfig {
    /// Create a new store configuration
    ///
    /// # Arguments
    /// * `data_dir` - Directory holding the record files
    /// * `field_separator` - Optional separator for raw records (defaults to ",")
    /// * `strict_records` - Whether to reject short or long raw records
    /// * `verbose` - Whether to show verbose output
    pub fn new(
        data_dir: impl Into<PathBuf>,
        field_separator: Option<String>,
        strict_records: bool,
        verbose: bool,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            field_separator: field_separator
                .filter(|sep| !sep.is_empty())
                .unwrap_or_else(|| ",".to_string()),
            strict_records,
            verbose,
        }
    }

    /// Get the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the raw record separator
    pub fn field_separator(&self) -> &str {
        &self.field_separator
    }

    /// Get whether malformed records are rejected
    pub fn strict_records(&self) -> bool {
        self.strict_records
    }

    /// Get the verbose flag
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Byte delimiter for record files
    ///
    /// Record files share the raw record separator when it is a single byte,
    /// and fall back to commas otherwise.
    pub fn store_delimiter(&self) -> u8 {
        match self.field_separator.as_bytes() {
            [byte] => *byte,
            _ => b',',
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(".", None, false, false)
    }
}
