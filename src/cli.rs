//! CLI argument parsing module for tabstore
//!
//! This module defines the `tabstore` command line with clap: global options
//! that configure where and how tables are stored, and one subcommand per
//! registry operation. It also renders result rows as CSV for stdout.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::aggregate::Aggregate;
use crate::row::Row;

/// Command-line arguments for tabstore
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Embedded table store backed by CSV record files"
)]
pub struct TabstoreArgs {
    /// Directory holding the record files
    ///
    /// Each preset table keeps its rows in its own file inside this directory
    /// (employee_table.csv, department_table.csv, address_table.csv).
    #[clap(short, long, default_value = ".", help = "Directory holding the record files")]
    pub data_dir: PathBuf,

    /// Separator for raw records passed to insert
    ///
    /// Single-byte separators are also used as the record file delimiter.
    #[clap(short = 'F', help = "Field separator for raw records")]
    pub field_separator: Option<String>,

    /// Reject raw records whose field count does not match the table
    #[clap(long, help = "Reject records with too few or too many fields")]
    pub strict: bool,

    /// Enable verbose diagnostic output
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Registry operations
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert the sample addresses, departments and employees
    Seed,

    /// Insert a raw record into a table
    Insert {
        /// Table name
        table: String,
        /// Field values, separated by the field separator
        record: String,
    },

    /// Select rows by numeric range or exact match
    Select {
        /// Table name
        table: String,

        #[clap(
            long,
            num_args = 2,
            value_names = ["START", "END"],
            allow_negative_numbers = true,
            conflicts_with = "equals",
            required_unless_present = "equals",
            help = "Closed integer range over the table's range column"
        )]
        range: Option<Vec<i64>>,

        #[clap(long, help = "Exact value of the table's match column")]
        equals: Option<String>,
    },

    /// Inner-join tables left to right
    Join {
        #[clap(long, value_delimiter = ',', required = true, help = "Tables to join, in order")]
        tables: Vec<String>,

        #[clap(long, value_delimiter = ',', required = true, help = "Join column for each step")]
        on: Vec<String>,
    },

    /// Aggregate an integer column
    Aggregate {
        /// Table name
        table: String,
        /// Column to aggregate
        column: String,
        /// One of count, sum, min, max, mean
        function: Aggregate,
    },
}

/// Parse command-line arguments into the TabstoreArgs structure
pub fn parse_args() -> Result<TabstoreArgs> {
    Ok(TabstoreArgs::parse())
}

/// Write rows as CSV with a header line
///
/// The header is the union of the rows' columns in first-seen order; a row
/// lacking a column gets an empty field. Nothing is written for no rows.
pub fn write_rows<W: io::Write>(out: W, rows: &[Row]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut header: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !header.iter().any(|c| c == column) {
                header.push(column.to_string());
            }
        }
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    writer.write_record(&header)?;
    for row in rows {
        writer.serialize(row.project(&header))?;
    }
    writer.flush()?;
    Ok(())
}
