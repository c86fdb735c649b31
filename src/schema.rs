//! Schema module for tabstore
//!
//! Table variants are described as data rather than as separate types: a
//! [`TableSpec`] names the columns, the uniqueness key, the selection the
//! table supports and the record file that backs it. The preset layouts
//! (employees, departments, addresses) are exposed through [`TableKind`].

use std::fmt;

use crate::error::{TabError, TabResult};

/// The kind of selection a table accepts, and on which column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Closed integer range over the column
    Range(String),
    /// Exact text match on the column
    Equals(String),
}

impl Selector {
    /// The column the selector is evaluated against
    pub fn column(&self) -> &str {
        match self {
            Selector::Range(column) | Selector::Equals(column) => column,
        }
    }
}

/// Selection criteria passed to `Table::select`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    /// Rows whose range column lies in `start..=end`
    Range { start: i64, end: i64 },
    /// Rows whose equality column equals the text
    Equals(String),
}

/// Static description of one table variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    name: String,
    columns: Vec<String>,
    unique_key: Vec<String>,
    selector: Selector,
    file_name: String,
}

impl TableSpec {
    /// Create a table description
    ///
    /// # Errors
    /// * `InvalidLayout` if the uniqueness key is empty
    /// * `ColumnNotFound` if a key column or the selector column is not in `columns`
    pub fn new<C, K>(
        name: &str,
        columns: C,
        unique_key: K,
        selector: Selector,
        file_name: &str,
    ) -> TabResult<Self>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let spec = TableSpec::build(name, columns, unique_key, selector, file_name);
        spec.validate()?;
        Ok(spec)
    }

    fn build<C, K>(
        name: &str,
        columns: C,
        unique_key: K,
        selector: Selector,
        file_name: &str,
    ) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        TableSpec {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
            unique_key: unique_key.into_iter().map(Into::into).collect(),
            selector,
            file_name: file_name.to_string(),
        }
    }

    fn validate(&self) -> TabResult<()> {
        if self.unique_key.is_empty() {
            return Err(TabError::InvalidLayout {
                table: self.name.clone(),
                reason: "uniqueness key must not be empty".to_string(),
            });
        }
        let required = self.unique_key.iter().map(String::as_str);
        for column in required.chain([self.selector.column()]) {
            if !self.has_column(column) {
                return Err(TabError::ColumnNotFound {
                    table: self.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    /// A built-in layout, known to be valid
    fn preset<C, K>(
        name: &str,
        columns: C,
        unique_key: K,
        selector: Selector,
        file_name: &str,
    ) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        let spec = TableSpec::build(name, columns, unique_key, selector, file_name);
        debug_assert!(spec.validate().is_ok(), "preset '{}' is inconsistent", name);
        spec
    }

    /// Employees: unique on (employee_id, department_id), range over employee_id
    pub fn employees() -> Self {
        TableSpec::preset(
            "employees",
            ["employee_id", "name", "age", "salary", "department_id"],
            ["employee_id", "department_id"],
            Selector::Range("employee_id".to_string()),
            "employee_table.csv",
        )
    }

    /// Departments: unique on department_id, exact match on department_name
    pub fn departments() -> Self {
        TableSpec::preset(
            "departments",
            ["department_id", "department_name", "address_id"],
            ["department_id"],
            Selector::Equals("department_name".to_string()),
            "department_table.csv",
        )
    }

    /// Addresses: unique on address_id, range over address_id
    pub fn addresses() -> Self {
        TableSpec::preset(
            "addresses",
            ["address_id", "city", "street", "house_number"],
            ["address_id"],
            Selector::Range("address_id".to_string()),
            "address_table.csv",
        )
    }

    /// Name used in messages
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared columns, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns forming the uniqueness key
    pub fn unique_key(&self) -> &[String] {
        &self.unique_key
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Name of the record file inside the data directory
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Whether a column is part of the declared schema
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// The preset table layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Employees,
    Departments,
    Addresses,
}

impl TableKind {
    /// Every preset, in registration order
    pub const ALL: [TableKind; 3] = [
        TableKind::Employees,
        TableKind::Departments,
        TableKind::Addresses,
    ];

    /// Column layout, key and selector for this preset
    pub fn spec(self) -> TableSpec {
        match self {
            TableKind::Employees => TableSpec::employees(),
            TableKind::Departments => TableSpec::departments(),
            TableKind::Addresses => TableSpec::addresses(),
        }
    }

    /// The registry name the preset is conventionally registered under
    pub fn table_name(self) -> &'static str {
        match self {
            TableKind::Employees => "employees",
            TableKind::Departments => "departments",
            TableKind::Addresses => "addresses",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}
