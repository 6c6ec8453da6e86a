use thiserror::Error;

/// Reasons a filter state cannot be turned into a statement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Sort column or direction outside the allow-list.
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// A sort column configured for the allow-list is not a plain identifier.
    #[error("Invalid sort column in allow-list: {0}")]
    InvalidIdentifier(String),

    /// A date bound that is not `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    #[error("Invalid value for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    /// Unknown featured token.
    #[error("Invalid featured filter: {0}")]
    InvalidFeatured(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
