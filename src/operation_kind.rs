//! The two kinds of money movement: income and expense.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was earned or spent.
///
/// Categories have a kind, and so do operations. The text labels `income` and
/// `expense` are used in the database, in CSV files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. rent.
    Expense,
}

impl OperationKind {
    /// The label stored in the database and written to CSV files.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Income => "income",
            OperationKind::Expense => "expense",
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    /// Parse `income` or `expense`, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    /// Returns [Error::ConstraintViolation] for any other label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(OperationKind::Income),
            "expense" => Ok(OperationKind::Expense),
            _ => Err(Error::ConstraintViolation(format!(
                "unknown type \"{s}\", expected \"income\" or \"expense\""
            ))),
        }
    }
}

impl ToSql for OperationKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for OperationKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|_| FromSqlError::InvalidType)
    }
}
