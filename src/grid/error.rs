//! Grid construction and configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("header requires at least one column")]
    NoColumns,

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),

    #[error("unknown comparator: {0}")]
    UnknownComparator(String),

    #[error("invalid sortable value: {0}")]
    InvalidSortable(String),
}
