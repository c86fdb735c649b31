//! tabstore - command-line driver for the embedded table store
//!
//! Opens the preset tables (employees, departments, addresses) from a data
//! directory, registers them in one `Database`, and runs a single operation
//! against it.
//!
//! # Program Flow
//!
//! 1. Parse command-line arguments
//! 2. Install the log subscriber (stderr)
//! 3. Open each preset table from its record file and register it
//! 4. Run the requested operation
//! 5. Print result rows as CSV to stdout

use std::io;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tabstore::cli::{self, Command};
use tabstore::config::StoreConfig;
use tabstore::database::Database;
use tabstore::schema::{Criteria, TableKind};
use tabstore::table::Table;

/// Sample rows inserted by `seed`, parents before children
const SEED_ROWS: &[(&str, &str)] = &[
    ("addresses", "1,Москва,Тверская,10"),
    ("addresses", "2,Санкт-Петербург,Невский пр.,22"),
    ("addresses", "3,Новосибирск,Красный пр.,50"),
    ("departments", "1,Отдел продаж,1"),
    ("departments", "2,Маркетинг,2"),
    ("departments", "3,IT-отдел,3"),
    ("employees", "1,Alice,30,70000,1"),
    ("employees", "2,Bob,29,100000,1"),
    ("employees", "3,Ivan,28,55000,2"),
    ("employees", "4,Olga,25,45000,3"),
    ("employees", "5,Sergey,40,70000,2"),
];

fn main() -> Result<()> {
    let args = cli::parse_args()?;

    let config = StoreConfig::new(
        args.data_dir.clone(),
        args.field_separator.clone(),
        args.strict,
        args.verbose,
    );
    init_tracing(config.verbose());
    debug!(?args, "parsed arguments");

    let mut database = open_database(&config)?;

    match args.command {
        Command::Seed => seed(&mut database, &config),
        Command::Insert { table, record } => {
            database
                .insert(&table, &record)
                .with_context(|| format!("Failed to insert into '{table}'"))?;
            info!(table = %table, "row inserted");
            Ok(())
        }
        Command::Select {
            table,
            range,
            equals,
        } => {
            let criteria = match (range, equals) {
                (Some(bounds), _) => Criteria::Range {
                    start: bounds[0],
                    end: bounds[1],
                },
                (None, Some(value)) => Criteria::Equals(value),
                (None, None) => anyhow::bail!("select needs --range or --equals"),
            };

            match database
                .select(&table, &criteria)
                .with_context(|| format!("Failed to select from '{table}'"))?
            {
                Some(rows) => cli::write_rows(io::stdout().lock(), &rows),
                None => {
                    eprintln!("Table '{table}' does not exist");
                    Ok(())
                }
            }
        }
        Command::Join { tables, on } => {
            let tables: Vec<&str> = tables.iter().map(String::as_str).collect();
            let on: Vec<&str> = on.iter().map(String::as_str).collect();
            let rows = database
                .join(&tables, &on)
                .context("Failed to join tables")?;
            cli::write_rows(io::stdout().lock(), &rows)
        }
        Command::Aggregate {
            table,
            column,
            function,
        } => {
            let value = database
                .aggregate(&table, &column, function)
                .with_context(|| format!("Failed to aggregate '{table}.{column}'"))?;
            println!("{value}");
            Ok(())
        }
    }
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Open every preset table from the data directory and register it
fn open_database(config: &StoreConfig) -> Result<Database> {
    let mut database = Database::new();
    for kind in TableKind::ALL {
        let table = Table::open(kind.spec(), config).with_context(|| {
            format!(
                "Failed to open table '{}' in {}",
                kind,
                config.data_dir().display()
            )
        })?;
        database.register_table(kind.table_name(), table);
    }
    Ok(database)
}

/// Insert the sample rows, skipping ones whose keys are already present
fn seed(database: &mut Database, config: &StoreConfig) -> Result<()> {
    let separator = config.field_separator();
    let mut inserted = 0;

    for (table, record) in SEED_ROWS {
        let record = record.replace(',', separator);
        match database.insert(table, &record) {
            Ok(()) => inserted += 1,
            Err(e) if e.is_validation() => eprintln!("Skipping {table} row '{record}': {e}"),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to seed '{table}'"));
            }
        }
    }

    info!(inserted, "seeded sample data");
    println!("Seeded {inserted} rows");
    Ok(())
}
