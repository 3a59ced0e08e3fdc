//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, OperationKind, database_id::CategoryId};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::ConstraintViolation] if `name` is
    /// empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::ConstraintViolation(
                "category name cannot be empty".to_owned(),
            ))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping of operations with a fixed kind (e.g., 'Rent', 'Salary').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The ID assigned by the database when the category was created.
    pub id: CategoryId,
    /// The unique name of the category.
    pub name: CategoryName,
    /// Whether operations in this category are income or expenses.
    pub kind: OperationKind,
}
