//! The record store: create, read, update and delete categories and operations,
//! and move them in and out of CSV files.

use std::io::{Read, Write};

use crate::{
    Error, OperationKind,
    category::{self, Category, CategoryName},
    csv_transfer,
    database_id::{CategoryId, OperationId},
    db::Database,
    operation::{self, Operation, OperationBuilder, OperationWithCategory},
};

/// Stores categories and operations in a SQLite database.
///
/// Each method locks the shared connection for the duration of the call and
/// commits its changes before returning.
#[derive(Debug, Clone)]
pub struct RecordStore {
    database: Database,
}

impl RecordStore {
    /// Create a record store backed by `database`.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Create a category.
    ///
    /// # Errors
    /// Returns [Error::ConstraintViolation] if the name is empty or already exists.
    pub fn add_category(&self, name: &str, kind: OperationKind) -> Result<Category, Error> {
        let name = CategoryName::new(name)?;
        category::create_category(name, kind, &*self.database.lock()?)
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no category with `id`.
    pub fn get_category(&self, id: CategoryId) -> Result<Category, Error> {
        category::get_category(id, &*self.database.lock()?)
    }

    /// Get all categories in the order they were created, optionally only those of `kind`.
    pub fn get_categories(&self, kind: Option<OperationKind>) -> Result<Vec<Category>, Error> {
        category::get_categories(kind, &*self.database.lock()?)
    }

    /// Overwrite the name and kind of the category with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no category with `id`, or
    /// [Error::ConstraintViolation] if the new name is empty or taken.
    pub fn update_category(
        &self,
        id: CategoryId,
        new_name: &str,
        new_kind: OperationKind,
    ) -> Result<Category, Error> {
        let new_name = CategoryName::new(new_name)?;
        category::update_category(id, new_name, new_kind, &*self.database.lock()?)
    }

    /// Delete the category with `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no category with `id`, or
    /// [Error::ConstraintViolation] if operations still reference it.
    pub fn delete_category(&self, id: CategoryId) -> Result<(), Error> {
        category::delete_category(id, &*self.database.lock()?)
    }

    /// Record an operation.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not positive, or
    /// [Error::ForeignKeyViolation] if the category does not exist.
    pub fn add_operation(&self, operation: OperationBuilder) -> Result<Operation, Error> {
        operation::create_operation(operation, &*self.database.lock()?)
    }

    /// Get an operation by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no operation with `id`.
    pub fn get_operation(&self, id: OperationId) -> Result<Operation, Error> {
        operation::get_operation(id, &*self.database.lock()?)
    }

    /// Get up to `limit` operations with their category names, newest first.
    ///
    /// See [operation::DASHBOARD_OPERATION_LIMIT] and
    /// [operation::FULL_OPERATION_LIMIT] for the usual limits.
    pub fn get_operations(&self, limit: u32) -> Result<Vec<OperationWithCategory>, Error> {
        operation::get_operations(limit, &*self.database.lock()?)
    }

    /// The number of stored operations.
    pub fn count_operations(&self) -> Result<u64, Error> {
        operation::count_operations(&*self.database.lock()?)
    }

    /// Delete the operation with `id`, doing nothing if it does not exist.
    pub fn delete_operation(&self, id: OperationId) -> Result<(), Error> {
        operation::delete_operation(id, &*self.database.lock()?)
    }

    /// Import categories from CSV, see [csv_transfer::import_categories_csv].
    pub fn import_categories_csv(&self, source: impl Read) -> Result<usize, Error> {
        csv_transfer::import_categories_csv(source, &*self.database.lock()?)
    }

    /// Export categories as CSV, see [csv_transfer::export_categories_csv].
    pub fn export_categories_csv(&self, sink: impl Write) -> Result<usize, Error> {
        csv_transfer::export_categories_csv(sink, &*self.database.lock()?)
    }

    /// Import operations from CSV, see [csv_transfer::import_operations_csv].
    pub fn import_operations_csv(&self, source: impl Read) -> Result<usize, Error> {
        csv_transfer::import_operations_csv(source, &*self.database.lock()?)
    }

    /// Export operations as CSV, see [csv_transfer::export_operations_csv].
    pub fn export_operations_csv(&self, sink: impl Write) -> Result<usize, Error> {
        csv_transfer::export_operations_csv(sink, &*self.database.lock()?)
    }
}
