//! Integration tests for the table registry
//!
//! Each test opens the preset tables from a fresh temporary data directory,
//! so inserts go all the way through to the CSV record files.

use std::fs;

use tabstore::aggregate::{Aggregate, AggregateValue};
use tabstore::config::StoreConfig;
use tabstore::database::Database;
use tabstore::error::TabError;
use tabstore::row::Row;
use tabstore::schema::{Criteria, TableKind, TableSpec};
use tabstore::table::Table;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn open_database(config: &StoreConfig) -> Result<Database, TabError> {
    let mut db = Database::new();
    for kind in TableKind::ALL {
        db.register_table(kind.table_name(), Table::open(kind.spec(), config)?);
    }
    Ok(db)
}

fn setup() -> Result<(TempDir, StoreConfig, Database), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::new(temp_dir.path(), None, false, false);
    let db = open_database(&config)?;
    Ok((temp_dir, config, db))
}

fn employee(id: &str, name: &str, age: &str, salary: &str, department_id: &str) -> Row {
    Row::zip(
        ["employee_id", "name", "age", "salary", "department_id"],
        [id, name, age, salary, department_id],
    )
}

fn insert_staff(db: &mut Database) -> TestResult {
    db.insert("addresses", "1,Москва,Тверская,10")?;
    db.insert("addresses", "2,Санкт-Петербург,Невский пр.,22")?;
    db.insert("departments", "1,Отдел продаж,1")?;
    db.insert("departments", "2,Маркетинг,2")?;
    db.insert("employees", "1,Alice,30,70000,1")?;
    db.insert("employees", "2,Bob,29,100000,1")?;
    db.insert("employees", "3,Ivan,28,55000,2")?;
    Ok(())
}

#[test]
fn test_insert_and_select_employees() -> TestResult {
    let (_temp_dir, _config, mut db) = setup()?;
    db.insert("employees", "1,Alice,30,70000,1")?;
    db.insert("employees", "2,Bob,28,60000,1")?;

    let rows = db
        .select("employees", &Criteria::Range { start: 1, end: 2 })?
        .expect("employees is registered");
    assert_eq!(
        rows,
        vec![
            employee("1", "Alice", "30", "70000", "1"),
            employee("2", "Bob", "28", "60000", "1"),
        ]
    );

    let rows = db
        .select("employees", &Criteria::Range { start: 2, end: 2 })?
        .unwrap();
    assert_eq!(rows, vec![employee("2", "Bob", "28", "60000", "1")]);

    let rows = db
        .select("employees", &Criteria::Range { start: 3, end: 4 })?
        .unwrap();
    assert!(rows.is_empty());

    Ok(())
}

#[test]
fn test_duplicate_key_is_rejected_without_mutation() -> TestResult {
    let (_temp_dir, config, mut db) = setup()?;
    db.insert("employees", "1,Alice,30,70000,1")?;
    db.insert("employees", "2,Bob,28,60000,1")?;

    let err = db.insert("employees", "2,John,30,47000,1").unwrap_err();
    assert!(err.is_validation());
    assert_eq!(db.get_table("employees")?.row_count(), 2);

    // The file was not rewritten with the rejected row either
    let text = fs::read_to_string(config.data_dir().join("employee_table.csv"))?;
    assert!(!text.contains("John"));
    Ok(())
}

#[test]
fn test_departments_select_by_name() -> TestResult {
    let (_temp_dir, _config, mut db) = setup()?;
    db.insert("departments", "1,Отдел продаж,1")?;

    let rows = db
        .select("departments", &Criteria::Equals("Отдел продаж".to_string()))?
        .unwrap();
    assert_eq!(
        rows,
        vec![Row::zip(
            ["department_id", "department_name", "address_id"],
            ["1", "Отдел продаж", "1"]
        )]
    );

    // A short record still collides on department_id
    assert!(db.insert("departments", "1,Маркетинг").unwrap_err().is_validation());
    Ok(())
}

#[test]
fn test_addresses_round_trip() -> TestResult {
    let (_temp_dir, _config, mut db) = setup()?;
    db.insert("addresses", "1,Москва,Тверская,10")?;
    db.insert("addresses", "2,Санкт-Петербург,Невский пр.,22")?;

    let rows = db
        .select("addresses", &Criteria::Range { start: 1, end: 2 })?
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].get("street"), Some("Невский пр."));

    assert!(db
        .insert("addresses", "1,Санкт-Петербург,Невский пр.,22")
        .unwrap_err()
        .is_validation());
    Ok(())
}

#[test]
fn test_three_table_join_follows_employee_order() -> TestResult {
    let (_temp_dir, _config, mut db) = setup()?;
    insert_staff(&mut db)?;

    let rows = db.join(
        &["employees", "departments", "addresses"],
        &["department_id", "address_id"],
    )?;

    let names: Vec<&str> = rows.iter().map(|r| r.get("name").unwrap()).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Ivan"]);

    let expected_columns = vec![
        "employee_id",
        "name",
        "age",
        "salary",
        "department_id",
        "department_name",
        "address_id",
        "city",
        "street",
        "house_number",
    ];
    assert_eq!(rows[2].columns().collect::<Vec<_>>(), expected_columns);
    assert_eq!(rows[2].get("city"), Some("Санкт-Петербург"));
    assert_eq!(rows[0].get("department_name"), Some("Отдел продаж"));
    Ok(())
}

#[test]
fn test_join_reports_first_missing_table() -> TestResult {
    let (_temp_dir, _config, db) = setup()?;

    let err = db
        .join(&["employees", "projects", "clients"], &["a", "b"])
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("projects"));
    Ok(())
}

#[test]
fn test_aggregate_employees() -> TestResult {
    let (_temp_dir, _config, mut db) = setup()?;
    db.insert("employees", "1,Alice,30,70000,1")?;
    db.insert("employees", "2,Bob,29,100000,1")?;
    db.insert("employees", "3,Ivan,28,55000,2")?;
    db.insert("employees", "4,Olga,25,45000,3")?;
    db.insert("employees", "5,Sergey,40,70000,2")?;

    assert_eq!(
        db.aggregate("employees", "employee_id", Aggregate::Count)?,
        AggregateValue::Integer(5)
    );
    assert_eq!(
        db.aggregate("employees", "salary", Aggregate::Min)?,
        AggregateValue::Integer(45000)
    );
    assert_eq!(
        db.aggregate("employees", "salary", Aggregate::Max)?,
        AggregateValue::Integer(100000)
    );
    assert_eq!(
        db.aggregate("employees", "salary", Aggregate::Mean)?,
        AggregateValue::Float(68000.0)
    );

    let mean = db.aggregate_with("employees", "salary", |values| {
        values.iter().sum::<i64>() as f64 / values.len() as f64
    })?;
    assert_eq!(mean, 68000.0);
    Ok(())
}

#[test]
fn test_aggregate_salaries_near_i64_max() -> TestResult {
    let (_temp_dir, _config, mut db) = setup()?;
    db.insert("employees", "1,Alice,30,9223372036854775807,1")?;
    db.insert("employees", "2,Bob,29,1,1")?;

    assert_eq!(
        db.aggregate("employees", "salary", Aggregate::Sum)?,
        AggregateValue::Integer(9223372036854775808)
    );
    assert_eq!(
        db.aggregate("employees", "salary", Aggregate::Mean)?,
        AggregateValue::Float(4611686018427387904.0)
    );
    assert_eq!(
        db.aggregate("employees", "salary", Aggregate::Max)?,
        AggregateValue::Integer(i128::from(i64::MAX))
    );
    Ok(())
}

#[test]
fn test_registered_table_names() -> TestResult {
    let (_temp_dir, _config, db) = setup()?;

    assert_eq!(db.table_names(), vec!["addresses", "departments", "employees"]);
    assert!(db.has_table("departments"));
    assert!(!db.has_table("projects"));
    Ok(())
}

#[test]
fn test_rows_survive_reopening() -> TestResult {
    let (_temp_dir, config, mut db) = setup()?;
    insert_staff(&mut db)?;
    drop(db);

    let mut reopened = open_database(&config)?;
    assert_eq!(reopened.get_table("employees")?.row_count(), 3);
    assert_eq!(
        reopened.get_table("employees")?.rows()[0],
        employee("1", "Alice", "30", "70000", "1")
    );

    // Uniqueness still holds against rows loaded from disk
    assert!(reopened
        .insert("addresses", "2,Казань,Баумана,1")
        .unwrap_err()
        .is_validation());
    Ok(())
}

#[test]
fn test_record_file_layout() -> TestResult {
    let (_temp_dir, config, mut db) = setup()?;
    db.insert("addresses", "1,Москва,Тверская,10")?;
    db.insert("departments", "9,Research")?;

    let addresses = fs::read_to_string(config.data_dir().join("address_table.csv"))?;
    assert_eq!(addresses, "address_id,city,street,house_number\n1,Москва,Тверская,10\n");

    let departments = fs::read_to_string(config.data_dir().join("department_table.csv"))?;
    assert_eq!(departments, "department_id,department_name,address_id\n9,Research,\n");
    Ok(())
}

#[test]
fn test_strict_records_from_config() -> TestResult {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::new(temp_dir.path(), None, true, false);
    let mut db = open_database(&config)?;

    let err = db.insert("departments", "1,Sales").unwrap_err();
    assert!(matches!(err, TabError::MalformedRecord { expected: 3, found: 2 }));
    db.insert("departments", "1,Sales,1")?;
    Ok(())
}

#[test]
fn test_custom_separator_applies_to_records_and_files() -> TestResult {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::new(temp_dir.path(), Some(";".to_string()), false, false);
    let mut db = open_database(&config)?;

    db.insert("addresses", "1;Москва;Тверская, стр. 2;10")?;

    let text = fs::read_to_string(temp_dir.path().join("address_table.csv"))?;
    assert_eq!(
        text,
        "address_id;city;street;house_number\n1;Москва;Тверская, стр. 2;10\n"
    );

    let reopened = open_database(&config)?;
    assert_eq!(
        reopened.get_table("addresses")?.rows()[0].get("street"),
        Some("Тверская, стр. 2")
    );
    Ok(())
}

#[test]
fn test_quoted_values_round_trip_through_files() -> TestResult {
    let temp_dir = TempDir::new()?;
    let config = StoreConfig::new(temp_dir.path(), Some("|".to_string()), false, false);
    let spec = TableSpec::departments();

    let mut table = Table::open(spec.clone(), &config)?;
    table.insert("1|Sales, \"North\"|1")?;
    let expected = table.rows().to_vec();

    let reopened = Table::open(spec, &config)?;
    assert_eq!(reopened.rows(), expected.as_slice());
    Ok(())
}
