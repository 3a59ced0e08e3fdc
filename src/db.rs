//! Opening and initializing the application's SQLite database.

use std::{
    fs,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, category::create_category_table, operation::create_operation_table};

/// A shared handle to the application database.
///
/// The handle is cheap to clone. The store and the reporting engine are each
/// given a clone when they are constructed and lock the connection for the
/// duration of a single call.
#[derive(Debug, Clone)]
pub struct Database {
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database file at `path`, creating it and any missing parent
    /// directories if needed, and initialize the tables.
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be created or the
    /// database cannot be initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        tracing::debug!("opening database at {path:?}");
        let connection = Connection::open(path)?;

        Self::from_connection(connection)
    }

    /// Create a database that only lives in memory, used for tests and dry runs.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, initializing the tables if needed.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn from_connection(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Lock the connection for the duration of one call.
    ///
    /// The lock is released when the returned guard is dropped.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if another thread panicked while
    /// holding the lock.
    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// Create the tables for the domain models.
///
/// Foreign key enforcement is switched on for `connection`, SQLite leaves it
/// off by default.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_operation_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
