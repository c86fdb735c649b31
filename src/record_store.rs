//! Record store module for tabstore
//!
//! A record store is the durable backing for one table's rows. The table
//! loads everything once at construction and rewrites everything after each
//! insert, so the contract is just "load all rows" and "persist all rows".
//!
//! - [`CsvStore`] keeps rows in a delimiter-separated file with a header line,
//!   quoting fields the way the csv crate does (quote-enclosed, doubled quotes).
//! - [`MemoryStore`] keeps the last saved rows in memory, for tables that
//!   need no durability.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::TabResult;
use crate::row::Row;

/// Durable storage for one table's full row sequence
pub trait RecordStore {
    /// Load every stored row, in stored order
    ///
    /// A store with no content yields an empty vector rather than an error.
    /// `columns` is the table's declared layout; stores that keep their own
    /// header may check it against this.
    fn load(&mut self, columns: &[String]) -> TabResult<Vec<Row>>;

    /// Replace the stored content with `rows`, laid out in `columns` order
    fn save(&mut self, columns: &[String], rows: &[Row]) -> TabResult<()>;

    /// Short human-readable location, for logs
    fn describe(&self) -> String;
}

/// Rows stored in a delimiter-separated file with a header line
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    delimiter: u8,
}

impl CsvStore {
    /// Create a comma-separated store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvStore {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Use a different field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl RecordStore for CsvStore {
    fn load(&mut self, columns: &[String]) -> TabResult<Vec<Row>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no record file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        // Rows are still keyed by the file's own header
        if !headers.is_empty() && headers.as_slice() != columns {
            warn!(
                path = %self.path.display(),
                found = ?headers,
                expected = ?columns,
                "record header does not match the declared columns"
            );
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(Row::zip(headers.iter().map(String::as_str), record.iter()));
        }

        debug!(path = %self.path.display(), rows = rows.len(), "loaded record file");
        Ok(rows)
    }

    fn save(&mut self, columns: &[String], rows: &[Row]) -> TabResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(self.delimiter)
            .from_writer(BufWriter::new(file));

        writer.write_record(columns)?;
        for row in rows {
            writer.serialize(row.project(columns))?;
        }
        writer.flush()?;

        debug!(path = %self.path.display(), rows = rows.len(), "saved record file");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Rows kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<Row>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from rows as if they had been saved earlier
    pub fn with_rows(rows: Vec<Row>) -> Self {
        MemoryStore { rows }
    }
}

impl RecordStore for MemoryStore {
    fn load(&mut self, _columns: &[String]) -> TabResult<Vec<Row>> {
        Ok(self.rows.clone())
    }

    fn save(&mut self, columns: &[String], rows: &[Row]) -> TabResult<()> {
        self.rows = rows.iter().map(|row| row.project(columns)).collect();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Make sure the directory holding a record file exists
pub(crate) fn ensure_parent_dir(path: &Path) -> TabResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
