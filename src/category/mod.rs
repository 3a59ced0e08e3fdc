//! Categories group operations under a name with a fixed kind, e.g. "Rent" (expense).

mod db;
mod domain;

pub use db::{
    create_category, create_category_table, delete_category, get_categories, get_category,
    update_category,
};
pub use domain::{Category, CategoryName};
