//! The data-source boundary.
//!
//! The fetcher only needs something that can run a `?`-parameterized
//! statement and hand back rows keyed by column name. Sources must support
//! case-insensitive `LIKE` with `%` wildcards and an `ESCAPE` clause, and
//! compare `YYYY-MM-DD` text lexicographically.

use archive::Row;
use async_trait::async_trait;
use query::SqlParam;
use thiserror::Error;

/// Failures reported by a data source. Retrying is the source's business;
/// the fetcher passes these straight through.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Query task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// An asynchronous, read-only, query-capable data source.
///
/// Implementations must support:
/// - `?`-positional parameter binding, in the order given;
/// - case-insensitive `LIKE` with `%` wildcards and an `ESCAPE '\'` clause.
///   Search text arrives with `%`, `_` and `\` already backslash-escaped, so
///   a bound value such as `50\%` must match the literal text `50%`;
/// - lexicographic comparison of `YYYY-MM-DD` date strings.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Run `sql` with `params` bound positionally and return every row.
    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, SourceError>;
}
