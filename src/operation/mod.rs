//! Operations record a single income or expense against a category.

mod core;

pub use self::core::{
    DASHBOARD_OPERATION_LIMIT, FULL_OPERATION_LIMIT, Operation, OperationBuilder,
    OperationWithCategory, count_operations, create_operation, create_operation_table,
    delete_operation, get_all_operations, get_operation, get_operations,
    map_operation_with_category_row,
};
