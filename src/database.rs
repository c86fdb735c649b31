//! Database module for tabstore
//!
//! This module provides the table registry. A `Database` owns every table by
//! name, routes inserts and selections to them, and computes joins and
//! aggregates directly over the tables' rows.
//!
//! The registry is an ordinary value: the entry point builds one and passes it
//! to whatever needs it. Nothing stops a program from building two, but one per
//! process is the expected usage.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::aggregate::{Aggregate, AggregateValue};
use crate::error::{parse_int, TabError, TabResult};
use crate::join::join_chain;
use crate::row::Row;
use crate::schema::Criteria;
use crate::table::Table;

/// Registry of named tables
#[derive(Debug)]
pub struct Database {
    /// Collection of tables by name
    tables: HashMap<String, Table>,
}

impl Database {
    /// Create a new empty database
    pub fn new() -> Self {
        Database {
            tables: HashMap::new(),
        }
    }

    /// Register a table under a name
    ///
    /// An existing table with the same name is replaced.
    pub fn register_table(&mut self, name: impl Into<String>, table: Table) {
        let name = name.into();
        if self.tables.insert(name.clone(), table).is_some() {
            warn!(table = %name, "replaced previously registered table");
        } else {
            debug!(table = %name, "registered table");
        }
    }

    /// Insert a raw record into a table
    ///
    /// # Returns
    /// * `Ok(())` if the row was inserted and persisted
    /// * `Err(TabError::TableNotFound)` if no table has that name
    /// * Any error from `Table::insert`, unchanged
    pub fn insert(&mut self, table_name: &str, raw: &str) -> TabResult<()> {
        self.get_table_mut(table_name)?.insert(raw)
    }

    /// Select rows from a table
    ///
    /// # Returns
    /// * `Ok(None)` if no table has that name
    /// * `Ok(Some(rows))` with the matching rows in insertion order
    /// * `Err` if the table rejected the criteria or a value failed to parse
    pub fn select(&self, table_name: &str, criteria: &Criteria) -> TabResult<Option<Vec<Row>>> {
        match self.tables.get(table_name) {
            Some(table) => table.select(criteria).map(Some),
            None => {
                debug!(table = %table_name, "select on unregistered table");
                Ok(None)
            }
        }
    }

    /// Inner-join tables left to right
    ///
    /// `table_names[0]` is joined with `table_names[1]` on `join_columns[0]`,
    /// then the result with `table_names[2]` on `join_columns[1]`, and so on.
    ///
    /// # Returns
    /// * The merged rows in left-row-major order
    /// * `Err(TabError::TableNotFound)` naming the first unregistered table
    /// * `Err(TabError::InvalidJoin)` if the argument counts do not line up
    pub fn join(&self, table_names: &[&str], join_columns: &[&str]) -> TabResult<Vec<Row>> {
        let operands = table_names
            .iter()
            .map(|name| self.get_table(name).map(Table::rows))
            .collect::<TabResult<Vec<&[Row]>>>()?;

        debug!(tables = ?table_names, on = ?join_columns, "joining tables");
        join_chain(&operands, join_columns)
    }

    /// Aggregate an integer column with a built-in reducer
    pub fn aggregate(
        &self,
        table_name: &str,
        column: &str,
        aggregate: Aggregate,
    ) -> TabResult<AggregateValue> {
        self.aggregate_with(table_name, column, |values| aggregate.execute(values))
    }

    /// Aggregate an integer column with a caller-supplied reducer
    ///
    /// Every value of the column is parsed as an integer, in insertion order,
    /// before the reducer runs.
    ///
    /// # Returns
    /// * The reducer's result
    /// * `Err(TabError::TableNotFound)` if no table has that name
    /// * `Err(TabError::ColumnNotFound)` if the column is not declared
    /// * `Err(TabError::NumericParse)` if any value is not an integer
    pub fn aggregate_with<T, F>(&self, table_name: &str, column: &str, reducer: F) -> TabResult<T>
    where
        F: FnOnce(&[i64]) -> T,
    {
        let table = self.get_table(table_name)?;
        if !table.spec().has_column(column) {
            return Err(TabError::ColumnNotFound {
                table: table_name.to_string(),
                column: column.to_string(),
            });
        }

        let values = table
            .rows()
            .iter()
            .map(|row| parse_int(column, row.get(column).unwrap_or("")))
            .collect::<TabResult<Vec<i64>>>()?;

        Ok(reducer(&values))
    }

    /// Get a reference to a table
    ///
    /// # Returns
    /// * `Ok(&Table)` if the table exists
    /// * `Err` if the table doesn't exist
    pub fn get_table(&self, name: &str) -> TabResult<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| TabError::TableNotFound(name.to_string()))
    }

    /// Get a mutable reference to a table
    pub fn get_table_mut(&mut self, name: &str) -> TabResult<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| TabError::TableNotFound(name.to_string()))
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Names of all registered tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get number of tables in the database
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}
