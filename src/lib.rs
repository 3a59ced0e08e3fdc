//! Fintrack is a personal finance tracker.
//!
//! Income and expenses are recorded as operations against named categories
//! in a SQLite database. The library provides:
//!
//! - [RecordStore]: create, list, update and delete categories and operations,
//!   and import/export them as CSV.
//! - [ReportingEngine]: the balance, per-category totals, the largest
//!   operations and charts of them.
//! - Validation of amounts and dates before they reach the database.
//!
//! ```ignore
//! let database = Database::open("data/finance.db")?;
//! let store = RecordStore::new(database.clone());
//! let reports = ReportingEngine::new(database);
//!
//! let rent = store.add_category("Rent", OperationKind::Expense)?;
//! store.add_operation(Operation::build(
//!     950.0,
//!     rent.id,
//!     parse_date("2025-01-01")?,
//!     OperationKind::Expense,
//! ))?;
//!
//! println!("{}", format_currency(reports.get_balance()?));
//! ```

#![warn(missing_docs)]

mod category;
mod csv_transfer;
mod currency;
mod database_id;
mod db;
mod error;
mod operation;
mod operation_kind;
mod report;
mod store;
#[cfg(test)]
mod test_utils;
mod validation;

pub use category::{Category, CategoryName};
pub use csv_transfer::{CATEGORY_HEADER, OPERATION_HEADER};
pub use currency::format_currency;
pub use database_id::{CategoryId, DatabaseId, OperationId};
pub use db::{Database, initialize as initialize_db};
pub use error::Error;
pub use operation::{
    DASHBOARD_OPERATION_LIMIT, FULL_OPERATION_LIMIT, Operation, OperationBuilder,
    OperationWithCategory,
};
pub use operation_kind::OperationKind;
pub use report::{
    CategorySummaryEntry, ChartView, DailyTotals, ECHARTS_SCRIPT_URL, RenderedChart,
    ReportingEngine,
};
pub use store::RecordStore;
pub use validation::{DATE_FORMAT, format_date, parse_amount, parse_date, validate_amount};
