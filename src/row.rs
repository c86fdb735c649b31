//! Row module for tabstore
//!
//! A row is an ordered mapping from column name to string value. Rows keep
//! their columns in insertion order so that a table's rows always follow the
//! table's declared column order, and so that joined rows list the left
//! operand's columns before the right operand's new ones.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// One record: an ordered list of (column, value) pairs with map semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Row { fields: Vec::new() }
    }

    /// Build a row by zipping column names with values positionally
    ///
    /// Stops at the shorter of the two sequences, so a short value list leaves
    /// the trailing columns absent and surplus values are dropped.
    pub fn zip<C, V>(columns: C, values: V) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut row = Row::new();
        for (column, value) in columns.into_iter().zip(values) {
            row.set(column, value);
        }
        row
    }

    /// Get the value stored under a column, if present
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Set a column's value
    ///
    /// An existing column keeps its position and takes the new value;
    /// a new column is appended.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Merge another row into a copy of this one, the other row's values winning
    pub fn merge(&self, other: &Row) -> Row {
        let mut merged = self.clone();
        for (column, value) in &other.fields {
            merged.set(column.as_str(), value.as_str());
        }
        merged
    }

    /// Column names in order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// (column, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of columns present in this row
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the row carries no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lay the row out in the given column order
    ///
    /// Columns absent from this row become empty text; columns not listed are dropped.
    pub fn project(&self, columns: &[String]) -> Row {
        columns
            .iter()
            .map(|column| (column.as_str(), self.get(column).unwrap_or("")))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (column, value) in iter {
            row.set(column, value);
        }
        row
    }
}

/// Serializes as the sequence of its values, which is the shape a flat record takes
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.fields.len()))?;
        for (_, value) in &self.fields {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, value)?;
        }
        write!(f, "}}")
    }
}
