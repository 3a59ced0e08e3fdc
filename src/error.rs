//! Defines the crate level error type and its conversions from SQLite and CSV errors.

use crate::database_id::CategoryId;

/// The errors that may occur when recording or reporting on operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An amount was zero, negative, not finite or not a number at all.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A date did not match the `YYYY-MM-DD` format or is not a real calendar date.
    ///
    /// Callers should pass in the offending text.
    #[error("invalid date \"{0}\", expected the format YYYY-MM-DD")]
    InvalidDate(String),

    /// A category could not be stored because it breaks one of the category
    /// rules: duplicate name, empty name, unknown type, or the category is
    /// still referenced by operations.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// An operation referenced a category that does not exist.
    #[error("the category ID {0} does not refer to a valid category")]
    ForeignKeyViolation(CategoryId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A CSV document had the wrong header, the wrong number of columns or a
    /// field that could not be parsed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Reading from or writing to a file or stream failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                desc,
            ) => Error::ConstraintViolation(
                desc.unwrap_or_else(|| "UNIQUE constraint failed".to_owned()),
            ),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
                },
                desc,
            ) => Error::ConstraintViolation(
                desc.unwrap_or_else(|| "CHECK constraint failed".to_owned()),
            ),
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        if value.is_io_error() {
            Error::Io(value.to_string())
        } else {
            Error::MalformedInput(value.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}
