//! Read-only aggregate queries over the stored operations.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::Date;

use crate::{
    Error, OperationKind,
    operation::{OperationWithCategory, map_operation_with_category_row},
};

/// The total amount of one kind of operation for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummaryEntry {
    /// The name of the category.
    pub name: String,
    /// The sum of the amounts of the category's operations.
    pub total: f64,
}

/// The income and expense totals for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    /// The day the totals are for.
    #[serde(with = "crate::validation::iso_date")]
    pub date: Date,
    /// The sum of the day's income.
    pub income: f64,
    /// The sum of the day's expenses.
    pub expense: f64,
}

/// Total income minus total expenses, zero when there are no operations.
pub fn get_balance(connection: &Connection) -> Result<f64, Error> {
    let (income, expense): (f64, f64) = connection.query_row(
        "SELECT
            COALESCE(SUM(CASE WHEN operation_type = 'income' THEN amount END), 0.0),
            COALESCE(SUM(CASE WHEN operation_type = 'expense' THEN amount END), 0.0)
         FROM operation",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    tracing::debug!("income {income}, expense {expense}");

    Ok(income - expense)
}

/// The total of the operations of `kind` per category, ordered by category name.
///
/// Categories without matching operations are left out.
pub fn get_category_summary(
    kind: OperationKind,
    connection: &Connection,
) -> Result<Vec<CategorySummaryEntry>, Error> {
    connection
        .prepare(
            "SELECT c.name, SUM(o.amount)
             FROM operation o
             INNER JOIN category c ON o.category_id = c.id
             WHERE o.operation_type = :kind
             GROUP BY c.id, c.name
             ORDER BY c.name ASC",
        )?
        .query_map(&[(":kind", &kind)], map_summary_row)?
        .map(|maybe_entry| maybe_entry.map_err(|error| error.into()))
        .collect()
}

/// The `limit` largest operations of `kind`, largest first.
///
/// Operations with equal amounts come out in the order they were created.
pub fn get_top_by_amount(
    kind: OperationKind,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<OperationWithCategory>, Error> {
    connection
        .prepare(
            "SELECT o.id, o.amount, o.category_id, c.name, o.date, o.operation_type, o.comment
             FROM operation o
             INNER JOIN category c ON o.category_id = c.id
             WHERE o.operation_type = :kind
             ORDER BY o.amount DESC, o.id ASC
             LIMIT :limit",
        )?
        .query_map(
            rusqlite::named_params! {":kind": kind, ":limit": limit},
            map_operation_with_category_row,
        )?
        .map(|maybe_operation| maybe_operation.map_err(|error| error.into()))
        .collect()
}

/// Income and expense totals for every day that has operations, oldest first.
pub fn get_daily_totals(connection: &Connection) -> Result<Vec<DailyTotals>, Error> {
    connection
        .prepare(
            "SELECT
                date,
                COALESCE(SUM(CASE WHEN operation_type = 'income' THEN amount END), 0.0),
                COALESCE(SUM(CASE WHEN operation_type = 'expense' THEN amount END), 0.0)
             FROM operation
             GROUP BY date
             ORDER BY date ASC",
        )?
        .query_map([], map_daily_totals_row)?
        .map(|maybe_totals| maybe_totals.map_err(|error| error.into()))
        .collect()
}

fn map_summary_row(row: &Row) -> Result<CategorySummaryEntry, rusqlite::Error> {
    Ok(CategorySummaryEntry {
        name: row.get(0)?,
        total: row.get(1)?,
    })
}

fn map_daily_totals_row(row: &Row) -> Result<DailyTotals, rusqlite::Error> {
    Ok(DailyTotals {
        date: row.get(0)?,
        income: row.get(1)?,
        expense: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        OperationKind,
        category::{Category, CategoryName, create_category},
        db::initialize,
        operation::{Operation, create_operation},
        report::queries::{
            CategorySummaryEntry, DailyTotals, get_balance, get_category_summary,
            get_daily_totals, get_top_by_amount,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn create_test_category(name: &str, kind: OperationKind, connection: &Connection) -> Category {
        create_category(CategoryName::new_unchecked(name), kind, connection).unwrap()
    }

    fn add(amount: f64, category: &Category, date: Date, connection: &Connection) {
        create_operation(
            Operation::build(amount, category.id, date, category.kind),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn balance_of_empty_store_is_zero() {
        let connection = get_test_connection();

        assert_eq!(get_balance(&connection), Ok(0.0));
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let connection = get_test_connection();
        let salary = create_test_category("Salary", OperationKind::Income, &connection);
        let rent = create_test_category("Rent", OperationKind::Expense, &connection);
        add(100.0, &salary, date!(2025 - 01 - 01), &connection);
        add(40.0, &rent, date!(2025 - 01 - 02), &connection);

        assert_eq!(get_balance(&connection), Ok(60.0));
    }

    #[test]
    fn category_summary_sums_per_category() {
        let connection = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &connection);
        add(30.0, &rent, date!(2025 - 01 - 01), &connection);
        add(20.0, &rent, date!(2025 - 01 - 02), &connection);

        let summary = get_category_summary(OperationKind::Expense, &connection);

        assert_eq!(
            summary,
            Ok(vec![CategorySummaryEntry {
                name: "Rent".to_owned(),
                total: 50.0
            }])
        );
    }

    #[test]
    fn category_summary_is_ordered_by_name_and_filtered_by_kind() {
        let connection = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &connection);
        let food = create_test_category("Food", OperationKind::Expense, &connection);
        let salary = create_test_category("Salary", OperationKind::Income, &connection);
        add(10.0, &rent, date!(2025 - 01 - 01), &connection);
        add(5.0, &food, date!(2025 - 01 - 01), &connection);
        add(99.0, &salary, date!(2025 - 01 - 01), &connection);

        let names: Vec<String> = get_category_summary(OperationKind::Expense, &connection)
            .unwrap()
            .into_iter()
            .map(|entry| entry.name)
            .collect();

        assert_eq!(names, vec!["Food", "Rent"]);
    }

    #[test]
    fn category_summary_of_empty_store_is_empty() {
        let connection = get_test_connection();

        assert_eq!(
            get_category_summary(OperationKind::Income, &connection),
            Ok(vec![])
        );
    }

    #[test]
    fn top_by_amount_returns_largest_first() {
        let connection = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &connection);
        for amount in [10.0, 50.0, 30.0] {
            add(amount, &rent, date!(2025 - 01 - 01), &connection);
        }

        let amounts: Vec<f64> = get_top_by_amount(OperationKind::Expense, 2, &connection)
            .unwrap()
            .iter()
            .map(|operation| operation.amount)
            .collect();

        assert_eq!(amounts, vec![50.0, 30.0]);
    }

    #[test]
    fn top_by_amount_orders_equal_amounts_by_id() {
        let connection = get_test_connection();
        let rent = create_test_category("Rent", OperationKind::Expense, &connection);
        for date in [
            date!(2025 - 03 - 01),
            date!(2025 - 01 - 01),
            date!(2025 - 02 - 01),
        ] {
            add(10.0, &rent, date, &connection);
        }

        let top = get_top_by_amount(OperationKind::Expense, 3, &connection).unwrap();

        let ids: Vec<i64> = top.iter().map(|operation| operation.id).collect();
        let mut sorted_ids = ids.clone();
        sorted_ids.sort();
        assert_eq!(ids, sorted_ids);
        let dates: Vec<_> = top.iter().map(|operation| operation.date).collect();
        assert_eq!(
            dates,
            vec![
                date!(2025 - 03 - 01),
                date!(2025 - 01 - 01),
                date!(2025 - 02 - 01)
            ]
        );
    }

    #[test]
    fn top_by_amount_ignores_other_kind() {
        let connection = get_test_connection();
        let salary = create_test_category("Salary", OperationKind::Income, &connection);
        add(1000.0, &salary, date!(2025 - 01 - 01), &connection);

        assert_eq!(
            get_top_by_amount(OperationKind::Expense, 5, &connection),
            Ok(vec![])
        );
    }

    #[test]
    fn daily_totals_group_by_date() {
        let connection = get_test_connection();
        let salary = create_test_category("Salary", OperationKind::Income, &connection);
        let rent = create_test_category("Rent", OperationKind::Expense, &connection);
        add(100.0, &salary, date!(2025 - 01 - 02), &connection);
        add(40.0, &rent, date!(2025 - 01 - 02), &connection);
        add(15.0, &rent, date!(2025 - 01 - 01), &connection);
        add(5.0, &rent, date!(2025 - 01 - 01), &connection);

        let totals = get_daily_totals(&connection);

        assert_eq!(
            totals,
            Ok(vec![
                DailyTotals {
                    date: date!(2025 - 01 - 01),
                    income: 0.0,
                    expense: 20.0,
                },
                DailyTotals {
                    date: date!(2025 - 01 - 02),
                    income: 100.0,
                    expense: 40.0,
                },
            ])
        );
    }
}
