//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error, OperationKind,
    category::{Category, CategoryName},
    database_id::CategoryId,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// This function will return a:
/// - [Error::ConstraintViolation] if a category with the same name already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    kind: OperationKind,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, type) VALUES (?1, ?2);",
            (name.as_ref(), kind),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    let id = connection.last_insert_rowid();
    tracing::info!("created {kind} category {id} \"{name}\"");

    Ok(Category { id, name, kind })
}

/// Retrieve a single category by ID.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, type FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories in insertion order, optionally only those of `kind`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_categories(
    kind: Option<OperationKind>,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    match kind {
        Some(kind) => connection
            .prepare("SELECT id, name, type FROM category WHERE type = ?1 ORDER BY id ASC;")?
            .query_map([kind], map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect(),
        None => connection
            .prepare("SELECT id, name, type FROM category ORDER BY id ASC;")?
            .query_map([], map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect(),
    }
}

/// Overwrite the name and kind of a category.
///
/// Operations keep their own kind, changing the category's kind does not
/// rewrite them.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - [Error::ConstraintViolation] if another category already uses `new_name`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    category_id: CategoryId,
    new_name: CategoryName,
    new_kind: OperationKind,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, type = ?2 WHERE id = ?3",
            (new_name.as_ref(), new_kind, category_id),
        )
        .map_err(|error| map_duplicate_name(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!("updated category {category_id} to {new_kind} \"{new_name}\"");

    Ok(Category {
        id: category_id,
        name: new_name,
        kind: new_kind,
    })
}

/// Delete a category by ID.
///
/// Categories that are still referenced by operations cannot be deleted,
/// delete or move those operations first.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `category_id` does not refer to a valid category,
/// - [Error::ConstraintViolation] if operations still reference the category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| match error {
            // Databases created with `ON DELETE RESTRICT` report the trigger code.
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER,
                },
                _,
            ) => Error::ConstraintViolation(format!(
                "category {category_id} is still used by one or more operations"
            )),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!("deleted category {category_id}");

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            type TEXT NOT NULL CHECK(type IN ('income', 'expense'))
        );",
        (),
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::ConstraintViolation(format!("the category \"{name}\" already exists")),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let kind = row.get(2)?;

    Ok(Category { id, name, kind })
}

#[cfg(test)]
mod category_name_tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn new_fails_on_empty_string() {
        let name = CategoryName::new("");

        assert!(matches!(name, Err(Error::ConstraintViolation(_))));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let name = CategoryName::new("\n\t \r");

        assert!(matches!(name, Err(Error::ConstraintViolation(_))));
    }

    #[test]
    fn new_trims_whitespace() {
        let name = CategoryName::new("  Rent ").unwrap();

        assert_eq!(name.as_ref(), "Rent");
    }
}
