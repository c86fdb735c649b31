//! Table module for tabstore
//!
//! This module provides the table abstraction: the ordered rows of one
//! [`TableSpec`], backed by a [`RecordStore`]. It handles:
//!
//! - Loading rows from the store when the table is created
//! - Parsing raw delimiter-separated records on insert
//! - Enforcing the uniqueness key before any mutation
//! - Persisting the full row sequence after every successful insert
//! - Range and equality selection, preserving insertion order

use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{parse_int, TabError, TabResult};
use crate::record_store::{ensure_parent_dir, CsvStore, RecordStore};
use crate::row::Row;
use crate::schema::{Criteria, Selector, TableSpec};

/// An in-memory table kept in lockstep with its record store
pub struct Table {
    /// Columns, key and selector for this table
    spec: TableSpec,

    /// Rows in insertion order
    rows: Vec<Row>,

    /// Durable backing, rewritten after each insert
    store: Box<dyn RecordStore>,

    /// Separator used to split raw records
    field_separator: String,

    /// Reject records whose field count differs from the column count
    strict_records: bool,
}

impl Table {
    /// Create a table and populate it from its store
    ///
    /// Raw records are split on commas and malformed records are accepted;
    /// see [`Table::with_field_separator`] and [`Table::with_strict_records`].
    pub fn new(spec: TableSpec, mut store: Box<dyn RecordStore>) -> TabResult<Self> {
        let rows = store.load(spec.columns())?;
        debug!(store = %store.describe(), rows = rows.len(), "table loaded");

        Ok(Table {
            spec,
            rows,
            store,
            field_separator: ",".to_string(),
            strict_records: false,
        })
    }

    /// Open a table backed by its record file in the configured data directory
    ///
    /// The data directory is created if needed. A missing record file
    /// gives an empty table.
    pub fn open(spec: TableSpec, config: &StoreConfig) -> TabResult<Self> {
        let path = config.data_dir().join(spec.file_name());
        ensure_parent_dir(&path)?;
        let store = CsvStore::new(path).with_delimiter(config.store_delimiter());

        Ok(Table::new(spec, Box::new(store))?
            .with_field_separator(config.field_separator())
            .with_strict_records(config.strict_records()))
    }

    /// Split raw records on `separator` instead of commas
    pub fn with_field_separator(mut self, separator: &str) -> Self {
        if !separator.is_empty() {
            self.field_separator = separator.to_string();
        }
        self
    }

    /// Reject raw records that do not have exactly one value per column
    pub fn with_strict_records(mut self, strict: bool) -> Self {
        self.strict_records = strict;
        self
    }

    pub fn spec(&self) -> &TableSpec {
        &self.spec
    }

    /// Declared column names, in order
    pub fn columns(&self) -> &[String] {
        self.spec.columns()
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Insert a raw delimiter-separated record
    ///
    /// Values are matched to columns by position. The record is rejected if
    /// its uniqueness-key values equal those of an existing row; in that case
    /// nothing changes. On success the row is appended and the whole table is
    /// written to the store. A store failure is returned, but the appended row
    /// stays in memory.
    ///
    /// # Returns
    /// * `Ok(())` if the row was appended and persisted
    /// * `Err(TabError::UniqueViolation)` on a duplicate key
    /// * `Err(TabError::MalformedRecord)` on a wrong field count in strict mode
    /// * `Err` from the store if persisting failed
    pub fn insert(&mut self, raw: &str) -> TabResult<()> {
        let values: Vec<&str> = raw.split(self.field_separator.as_str()).collect();

        if self.strict_records && values.len() != self.spec.columns().len() {
            return Err(TabError::MalformedRecord {
                expected: self.spec.columns().len(),
                found: values.len(),
            });
        }

        let row = Row::zip(self.spec.columns().iter().map(String::as_str), values);

        if let Some(existing) = self.rows.iter().find(|existing| self.same_key(existing, &row)) {
            debug!(row = %existing, "uniqueness key already present");
            return Err(TabError::UniqueViolation {
                table: self.spec.name().to_string(),
                key: self.describe_key(&row),
            });
        }

        debug!(row = %row, "inserting row");
        self.rows.push(row);
        self.store.save(self.spec.columns(), &self.rows)
    }

    /// Select rows matching the criteria, in insertion order
    ///
    /// Range criteria apply to tables with a range selector and equality
    /// criteria to tables with an equality selector; any other pairing is an
    /// error. Rows lacking the selector column never match.
    pub fn select(&self, criteria: &Criteria) -> TabResult<Vec<Row>> {
        match (self.spec.selector(), criteria) {
            (Selector::Range(column), Criteria::Range { start, end }) => {
                let mut selected = Vec::new();
                for row in &self.rows {
                    if let Some(value) = row.get(column) {
                        let value = parse_int(column, value)?;
                        if *start <= value && value <= *end {
                            selected.push(row.clone());
                        }
                    }
                }
                Ok(selected)
            }
            (Selector::Equals(column), Criteria::Equals(wanted)) => Ok(self
                .rows
                .iter()
                .filter(|row| row.get(column) == Some(wanted.as_str()))
                .cloned()
                .collect()),
            (selector, _) => Err(TabError::InvalidCriteria {
                table: self.spec.name().to_string(),
                reason: match selector {
                    Selector::Range(column) => {
                        format!("selection is a numeric range over '{}'", column)
                    }
                    Selector::Equals(column) => {
                        format!("selection is an exact match on '{}'", column)
                    }
                },
            }),
        }
    }

    /// Whether two rows agree on every key column
    fn same_key(&self, a: &Row, b: &Row) -> bool {
        self.spec
            .unique_key()
            .iter()
            .all(|column| a.get(column) == b.get(column))
    }

    fn describe_key(&self, row: &Row) -> String {
        self.spec
            .unique_key()
            .iter()
            .map(|column| format!("{}={}", column, row.get(column).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("store", &self.store.describe())
            .field("columns", &self.spec.columns())
            .field("rows", &self.rows.len())
            .finish()
    }
}
