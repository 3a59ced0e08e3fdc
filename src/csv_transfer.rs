//! Bulk import and export of categories and operations as CSV.
//!
//! Category files have the header `name,type`. Operation files have the header
//! `amount,category_id,date,operation_type,comment`. Types are written as
//! `income` or `expense` and dates as `YYYY-MM-DD`.
//!
//! Comments are kept exactly as written, other fields ignore surrounding
//! whitespace.
//!
//! Imports store one row at a time and stop at the first row that fails.
//! Rows stored before the failure stay in the database.

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error, OperationKind,
    category::{CategoryName, create_category, get_categories},
    database_id::CategoryId,
    operation::{Operation, OperationBuilder, create_operation, get_all_operations},
    validation::{format_date, parse_date, validate_amount},
};

/// The header row of a category CSV file.
pub const CATEGORY_HEADER: [&str; 2] = ["name", "type"];

/// The header row of an operation CSV file.
pub const OPERATION_HEADER: [&str; 5] =
    ["amount", "category_id", "date", "operation_type", "comment"];

#[derive(Debug, Serialize)]
struct CategoryRow<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: OperationKind,
}

#[derive(Debug, Serialize)]
struct OperationRow<'a> {
    amount: f64,
    category_id: CategoryId,
    date: String,
    operation_type: OperationKind,
    comment: &'a str,
}

/// Import categories from CSV text with the header `name,type`.
///
/// Returns the number of categories that were created.
///
/// # Errors
/// This function will return a:
/// - [Error::MalformedInput] if the header is wrong or a row does not have two columns,
/// - [Error::ConstraintViolation] if a name is empty or already exists, or a type is unknown,
/// - [Error::Io] if `reader` fails,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn import_categories_csv(reader: impl Read, connection: &Connection) -> Result<usize, Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    check_header(reader.headers()?, &CATEGORY_HEADER)?;

    let mut imported = 0;

    for record in reader.records() {
        let record = record?;
        check_column_count(&record, CATEGORY_HEADER.len())?;

        let name = CategoryName::new(&record[0])?;
        let kind: OperationKind = record[1].parse()?;

        if let Err(error) = create_category(name, kind, connection) {
            tracing::warn!(
                "category import stopped on line {} after {imported} rows: {error}",
                line_number(&record)
            );
            return Err(error);
        }

        imported += 1;
    }

    tracing::info!("imported {imported} categories from CSV");

    Ok(imported)
}

/// Write every category as CSV with the header `name,type`.
///
/// Returns the number of categories written.
///
/// # Errors
/// This function will return an [Error::Io] if `writer` fails, or a
/// [Error::SqlError] if the categories cannot be read.
pub fn export_categories_csv(writer: impl Write, connection: &Connection) -> Result<usize, Error> {
    let categories = get_categories(None, connection)?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(CATEGORY_HEADER)?;

    for category in &categories {
        writer.serialize(CategoryRow {
            name: category.name.as_ref(),
            kind: category.kind,
        })?;
    }

    writer.flush()?;
    tracing::info!("exported {} categories to CSV", categories.len());

    Ok(categories.len())
}

/// Import operations from CSV text with the header
/// `amount,category_id,date,operation_type,comment`.
///
/// Returns the number of operations that were created.
///
/// # Errors
/// This function will return a:
/// - [Error::MalformedInput] if the header is wrong, a row does not have five
///   columns, or the amount, category ID or type cannot be parsed,
/// - [Error::InvalidAmount] if an amount is not positive,
/// - [Error::InvalidDate] if a date is not in the format `YYYY-MM-DD`,
/// - [Error::ForeignKeyViolation] if a category ID does not refer to a category,
/// - [Error::Io] if `reader` fails,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn import_operations_csv(reader: impl Read, connection: &Connection) -> Result<usize, Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    check_header(reader.headers()?, &OPERATION_HEADER)?;

    let mut imported = 0;

    for record in reader.records() {
        let record = record?;
        let result = parse_operation_record(&record)
            .and_then(|operation| create_operation(operation, connection));

        if let Err(error) = result {
            tracing::warn!(
                "operation import stopped on line {} after {imported} rows: {error}",
                line_number(&record)
            );
            return Err(error);
        }

        imported += 1;
    }

    tracing::info!("imported {imported} operations from CSV");

    Ok(imported)
}

/// Write every operation as CSV in the order they were created, with the header
/// `amount,category_id,date,operation_type,comment`.
///
/// The output can be imported again with [import_operations_csv] as long as
/// the category IDs still refer to the same categories.
///
/// # Errors
/// This function will return an [Error::Io] if `writer` fails, or a
/// [Error::SqlError] if the operations cannot be read.
pub fn export_operations_csv(writer: impl Write, connection: &Connection) -> Result<usize, Error> {
    let operations = get_all_operations(connection)?;

    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(OPERATION_HEADER)?;

    for operation in &operations {
        writer.serialize(OperationRow {
            amount: operation.amount,
            category_id: operation.category_id,
            date: format_date(operation.date),
            operation_type: operation.kind,
            comment: &operation.comment,
        })?;
    }

    writer.flush()?;
    tracing::info!("exported {} operations to CSV", operations.len());

    Ok(operations.len())
}

fn parse_operation_record(record: &StringRecord) -> Result<OperationBuilder, Error> {
    check_column_count(record, OPERATION_HEADER.len())?;
    let line = line_number(record);

    let amount: f64 = record[0].trim().parse().map_err(|_| {
        Error::MalformedInput(format!(
            "line {line}: could not parse \"{}\" as an amount",
            &record[0]
        ))
    })?;
    let amount = validate_amount(amount)?;
    let category_id: CategoryId = record[1].trim().parse().map_err(|_| {
        Error::MalformedInput(format!(
            "line {line}: could not parse \"{}\" as a category ID",
            &record[1]
        ))
    })?;
    let date = parse_date(&record[2])?;
    let kind: OperationKind = record[3].parse().map_err(|_| {
        Error::MalformedInput(format!(
            "line {line}: could not parse \"{}\" as an operation type",
            &record[3]
        ))
    })?;

    Ok(Operation::build(amount, category_id, date, kind).comment(&record[4]))
}

fn check_header(header: &StringRecord, want: &[&str]) -> Result<(), Error> {
    if header.iter().eq(want.iter().copied()) {
        return Ok(());
    }

    Err(Error::MalformedInput(format!(
        "expected the header \"{}\", got \"{}\"",
        want.join(","),
        header.iter().collect::<Vec<_>>().join(",")
    )))
}

fn check_column_count(record: &StringRecord, want: usize) -> Result<(), Error> {
    if record.len() == want {
        return Ok(());
    }

    Err(Error::MalformedInput(format!(
        "line {}: expected {want} columns, got {}",
        line_number(record),
        record.len()
    )))
}

fn line_number(record: &StringRecord) -> u64 {
    record.position().map_or(0, |position| position.line())
}
