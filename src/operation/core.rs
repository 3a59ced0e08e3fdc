//! Defines the core data models and database queries for operations.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, OperationKind,
    database_id::{CategoryId, OperationId},
    validation::validate_amount,
};

/// The number of operations shown in short listings, e.g. the recent activity
/// on a dashboard.
pub const DASHBOARD_OPERATION_LIMIT: u32 = 20;

/// The number of operations shown in a full listing.
pub const FULL_OPERATION_LIMIT: u32 = 2000;

// ============================================================================
// MODELS
// ============================================================================

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// To create a new `Operation`, use [Operation::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// The ID of the operation.
    pub id: OperationId,
    /// The amount of money earned or spent, always positive.
    pub amount: f64,
    /// The ID of the category the operation belongs to.
    pub category_id: CategoryId,
    /// When the operation happened.
    #[serde(with = "crate::validation::iso_date")]
    pub date: Date,
    /// Whether the money was earned or spent.
    pub kind: OperationKind,
    /// A free-text note, empty if none was given.
    pub comment: String,
}

impl Operation {
    /// Create a new operation.
    ///
    /// Shortcut for [OperationBuilder] for discoverability.
    pub fn build(
        amount: f64,
        category_id: CategoryId,
        date: Date,
        kind: OperationKind,
    ) -> OperationBuilder {
        OperationBuilder {
            amount,
            category_id,
            date,
            kind,
            comment: String::new(),
        }
    }
}

/// A builder for creating [Operation] instances.
///
/// Pass the builder to [create_operation] to store it and get the
/// [Operation] with its ID.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// let operation = Operation::build(45.99, rent.id, date!(2025-01-15), OperationKind::Expense)
///     .comment("January rent");
/// let operation = create_operation(operation, &connection)?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct OperationBuilder {
    /// The amount of money earned or spent, must be finite and greater than zero.
    pub amount: f64,
    /// The category the operation belongs to, must refer to an existing category.
    pub category_id: CategoryId,
    /// When the operation happened.
    pub date: Date,
    /// Whether the money was earned or spent.
    ///
    /// This usually matches the kind of the category but is stored separately.
    pub kind: OperationKind,
    /// A free-text note.
    pub comment: String,
}

impl OperationBuilder {
    /// Set the comment for the operation.
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_owned();
        self
    }
}

/// An operation together with the name of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationWithCategory {
    /// The ID of the operation.
    pub id: OperationId,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// The ID of the category the operation belongs to.
    pub category_id: CategoryId,
    /// The name of the category the operation belongs to.
    pub category_name: String,
    /// When the operation happened.
    #[serde(with = "crate::validation::iso_date")]
    pub date: Date,
    /// Whether the money was earned or spent.
    pub kind: OperationKind,
    /// A free-text note, empty if none was given.
    pub comment: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new operation in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is not a positive, finite number,
/// - [Error::ForeignKeyViolation] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_operation(
    builder: OperationBuilder,
    connection: &Connection,
) -> Result<Operation, Error> {
    validate_amount(builder.amount)?;

    let operation = connection
        .prepare(
            "INSERT INTO operation (amount, category_id, date, operation_type, comment)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, amount, category_id, date, operation_type, comment",
        )?
        .query_row(
            (
                builder.amount,
                builder.category_id,
                builder.date,
                builder.kind,
                &builder.comment,
            ),
            map_operation_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::ForeignKeyViolation(builder.category_id),
            error => error.into(),
        })?;

    tracing::info!(
        "created {} operation {} of {} in category {}",
        operation.kind,
        operation.id,
        operation.amount,
        operation.category_id
    );

    Ok(operation)
}

/// Retrieve an operation from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid operation,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_operation(id: OperationId, connection: &Connection) -> Result<Operation, Error> {
    let operation = connection
        .prepare(
            "SELECT id, amount, category_id, date, operation_type, comment
             FROM operation WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_operation_row)?;

    Ok(operation)
}

/// Retrieve the most recent operations joined with their category names.
///
/// Operations are ordered by date, newest first. Operations on the same date
/// are ordered by ID, newest first. At most `limit` operations are returned.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_operations(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<OperationWithCategory>, Error> {
    connection
        .prepare(
            "SELECT o.id, o.amount, o.category_id, c.name, o.date, o.operation_type, o.comment
             FROM operation o
             INNER JOIN category c ON o.category_id = c.id
             ORDER BY o.date DESC, o.id DESC
             LIMIT :limit",
        )?
        .query_map(&[(":limit", &limit)], map_operation_with_category_row)?
        .map(|maybe_operation| maybe_operation.map_err(|error| error.into()))
        .collect()
}

/// Retrieve every operation in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_operations(connection: &Connection) -> Result<Vec<Operation>, Error> {
    connection
        .prepare(
            "SELECT id, amount, category_id, date, operation_type, comment
             FROM operation ORDER BY id ASC",
        )?
        .query_map([], map_operation_row)?
        .map(|maybe_operation| maybe_operation.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of operations in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_operations(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM operation;", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Delete an operation by ID.
///
/// Deleting an operation that does not exist is a no-op.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn delete_operation(id: OperationId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM operation WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        tracing::debug!("operation {id} was already absent, nothing to delete");
    } else {
        tracing::info!("deleted operation {id}");
    }

    Ok(())
}

/// Create the operation table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_operation_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS operation (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                category_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                operation_type TEXT NOT NULL CHECK(operation_type IN ('income', 'expense')),
                comment TEXT NOT NULL DEFAULT '',
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE
                )",
        (),
    )?;

    // Used by the listing and time series queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_operation_date ON operation(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an Operation.
fn map_operation_row(row: &Row) -> Result<Operation, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let category_id = row.get(2)?;
    let date = row.get(3)?;
    let kind = row.get(4)?;
    let comment = row.get(5)?;

    Ok(Operation {
        id,
        amount,
        category_id,
        date,
        kind,
        comment,
    })
}

/// Map a database row with the columns
/// `id, amount, category_id, category name, date, operation_type, comment`
/// to an [OperationWithCategory].
pub fn map_operation_with_category_row(
    row: &Row,
) -> Result<OperationWithCategory, rusqlite::Error> {
    Ok(OperationWithCategory {
        id: row.get(0)?,
        amount: row.get(1)?,
        category_id: row.get(2)?,
        category_name: row.get(3)?,
        date: row.get(4)?,
        kind: row.get(5)?,
        comment: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, OperationKind,
        category::{Category, CategoryName, create_category},
        db::initialize,
        operation::{
            Operation, count_operations, create_operation, delete_operation, get_all_operations,
            get_operation, get_operations,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn create_test_category(name: &str, kind: OperationKind, conn: &Connection) -> Category {
        create_category(CategoryName::new_unchecked(name), kind, conn)
            .expect("Could not create category")
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);

        let result = create_operation(
            Operation::build(12.3, rent.id, date!(2025 - 10 - 05), OperationKind::Expense)
                .comment("October"),
            &conn,
        );

        match result {
            Ok(operation) => {
                assert!(operation.id > 0);
                assert_eq!(operation.amount, 12.3);
                assert_eq!(operation.category_id, rent.id);
                assert_eq!(operation.date, date!(2025 - 10 - 05));
                assert_eq!(operation.kind, OperationKind::Expense);
                assert_eq!(operation.comment, "October");
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();
        let category_id = 42;
        let count_before = count_operations(&conn).unwrap();

        let result = create_operation(
            Operation::build(
                123.45,
                category_id,
                date!(2025 - 10 - 04),
                OperationKind::Expense,
            ),
            &conn,
        );

        assert_eq!(result, Err(Error::ForeignKeyViolation(category_id)));
        assert_eq!(count_operations(&conn).unwrap(), count_before);
    }

    #[test]
    fn create_fails_on_non_positive_amount() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);

        for amount in [0.0, -5.0, f64::NAN] {
            let result = create_operation(
                Operation::build(amount, rent.id, date!(2025 - 10 - 04), OperationKind::Expense),
                &conn,
            );

            assert!(matches!(result, Err(Error::InvalidAmount(_))));
        }
        assert_eq!(count_operations(&conn).unwrap(), 0);
    }

    #[test]
    fn get_operation_succeeds() {
        let conn = get_test_connection();
        let salary = create_test_category("Salary", OperationKind::Income, &conn);
        let inserted = create_operation(
            Operation::build(
                1500.0,
                salary.id,
                date!(2025 - 03 - 01),
                OperationKind::Income,
            ),
            &conn,
        )
        .unwrap();

        let selected = get_operation(inserted.id, &conn);

        assert_eq!(selected, Ok(inserted));
    }

    #[test]
    fn get_operation_with_invalid_id_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_operation(1, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_operations_orders_by_date_descending_and_joins_category() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);
        let salary = create_test_category("Salary", OperationKind::Income, &conn);
        for (amount, category_id, date, kind) in [
            (10.0, rent.id, date!(2025 - 01 - 10), OperationKind::Expense),
            (30.0, salary.id, date!(2025 - 03 - 10), OperationKind::Income),
            (20.0, rent.id, date!(2025 - 02 - 10), OperationKind::Expense),
        ] {
            create_operation(Operation::build(amount, category_id, date, kind), &conn).unwrap();
        }

        let got = get_operations(10, &conn).unwrap();

        let amounts: Vec<f64> = got.iter().map(|operation| operation.amount).collect();
        assert_eq!(amounts, vec![30.0, 20.0, 10.0]);
        let names: Vec<&str> = got
            .iter()
            .map(|operation| operation.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Salary", "Rent", "Rent"]);
    }

    #[test]
    fn get_operations_respects_limit() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);
        for day in 1..=5 {
            let date = date!(2025 - 01 - 01).replace_day(day).unwrap();
            create_operation(
                Operation::build(day as f64, rent.id, date, OperationKind::Expense),
                &conn,
            )
            .unwrap();
        }

        let got = get_operations(2, &conn).unwrap();

        assert_eq!(got.len(), 2);
        assert_eq!(got[0].amount, 5.0);
        assert_eq!(got[1].amount, 4.0);
    }

    #[test]
    fn get_all_operations_returns_creation_order() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);
        let want: Vec<Operation> = [date!(2025 - 05 - 01), date!(2025 - 01 - 01)]
            .into_iter()
            .map(|date| {
                create_operation(
                    Operation::build(9.5, rent.id, date, OperationKind::Expense),
                    &conn,
                )
                .unwrap()
            })
            .collect();

        let got = get_all_operations(&conn).unwrap();

        assert_eq!(want, got);
    }

    #[test]
    fn delete_removes_operation() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);
        let operation = create_operation(
            Operation::build(50.0, rent.id, date!(2025 - 01 - 01), OperationKind::Expense),
            &conn,
        )
        .unwrap();

        delete_operation(operation.id, &conn).expect("Could not delete operation");

        assert_eq!(get_operation(operation.id, &conn), Err(Error::NotFound));
        assert_eq!(count_operations(&conn).unwrap(), 0);
    }

    #[test]
    fn delete_missing_operation_is_no_op() {
        let conn = get_test_connection();

        assert_eq!(delete_operation(999, &conn), Ok(()));
        assert_eq!(delete_operation(999, &conn), Ok(()));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &conn);
        let want_count = 20;
        for i in 1..=want_count {
            create_operation(
                Operation::build(i as f64, rent.id, date!(2025 - 10 - 05), OperationKind::Expense),
                &conn,
            )
            .expect("Could not create operation");
        }

        let got_count = count_operations(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
