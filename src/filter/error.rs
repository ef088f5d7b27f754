use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Invalid filter value: {0}")]
    InvalidValue(String),

    #[error("Unsupported sort field: {0}")]
    UnsupportedSortField(String),
}
