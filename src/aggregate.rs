//! Aggregate function module for tabstore
//!
//! This module contains the built-in reducers applied to an integer column.
//! Callers needing something else can pass their own closure to
//! `Database::aggregate_with`.

use std::fmt;
use std::str::FromStr;

/// Built-in aggregate reducers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// Number of values
    Count,
    /// Sum of values
    Sum,
    /// Smallest value
    Min,
    /// Largest value
    Max,
    /// Arithmetic mean, as a float
    Mean,
}

/// Result of an aggregate
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateValue {
    /// No values to reduce (min, max and mean of an empty column)
    Null,
    /// Wide enough to hold the sum of any column of `i64` values
    Integer(i128),
    Float(f64),
}

impl Aggregate {
    /// Convert a function name to an Aggregate
    ///
    /// # Arguments
    /// * `name` - The function name (case-insensitive); `avg` is accepted for `mean`
    ///
    /// # Returns
    /// * Some(Aggregate) if the name is known, None otherwise
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "count" => Some(Aggregate::Count),
            "sum" => Some(Aggregate::Sum),
            "min" => Some(Aggregate::Min),
            "max" => Some(Aggregate::Max),
            "mean" | "avg" => Some(Aggregate::Mean),
            _ => None,
        }
    }

    /// Apply the reducer to a column of integers
    pub fn execute(&self, values: &[i64]) -> AggregateValue {
        match self {
            Aggregate::Count => AggregateValue::Integer(values.len() as i128),
            Aggregate::Sum => AggregateValue::Integer(wide_sum(values)),
            Aggregate::Min => values
                .iter()
                .min()
                .map_or(AggregateValue::Null, |v| AggregateValue::Integer(i128::from(*v))),
            Aggregate::Max => values
                .iter()
                .max()
                .map_or(AggregateValue::Null, |v| AggregateValue::Integer(i128::from(*v))),
            Aggregate::Mean => {
                if values.is_empty() {
                    AggregateValue::Null
                } else {
                    AggregateValue::Float(wide_sum(values) as f64 / values.len() as f64)
                }
            }
        }
    }
}

impl FromStr for Aggregate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregate::from_name(s).ok_or_else(|| {
            format!(
                "unknown aggregate '{}', expected one of count, sum, min, max, mean",
                s
            )
        })
    }
}

/// Sum in i128 so that no column of i64 values can overflow
fn wide_sum(values: &[i64]) -> i128 {
    values.iter().map(|v| i128::from(*v)).sum()
}

impl fmt::Display for AggregateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateValue::Null => write!(f, "NULL"),
            AggregateValue::Integer(i) => write!(f, "{}", i),
            // Debug formatting keeps a trailing ".0" on whole floats
            AggregateValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}
