//! Tabstore library crate
//!
//! An embedded tabular store: a registry of named tables, each backed by a
//! flat CSV record file. The library provides:
//!
//! - Tables with a fixed column layout and a (possibly composite) uniqueness key
//! - Insertion of raw delimiter-separated records, persisted after every insert
//! - Range and equality selection that preserves insertion order
//! - Multi-table inner equi-joins chained left to right
//! - Integer column aggregates (count, sum, min, max, mean) or custom reducers
//!
//! Everything is synchronous and single-threaded; mutation goes through
//! `&mut` access to the [`database::Database`] that owns the tables.
//!
//! ```no_run
//! use tabstore::config::StoreConfig;
//! use tabstore::database::Database;
//! use tabstore::schema::{Criteria, TableKind};
//! use tabstore::table::Table;
//!
//! # fn main() -> tabstore::error::TabResult<()> {
//! let config = StoreConfig::new("data", None, false, false);
//! let mut db = Database::new();
//! for kind in TableKind::ALL {
//!     db.register_table(kind.table_name(), Table::open(kind.spec(), &config)?);
//! }
//!
//! db.insert("employees", "1,Alice,30,70000,1")?;
//! let rows = db.select("employees", &Criteria::Range { start: 1, end: 10 })?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod join;
pub mod record_store;
pub mod row;
pub mod schema;
pub mod table;
