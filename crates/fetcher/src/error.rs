//! Error types for the fetcher crate.

use crate::source::SourceError;
use archive::ArchiveError;
use query::QueryError;
use thiserror::Error;

/// Errors surfaced by [`crate::PageFetcher`].
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No active search: call reset() before more()")]
    NoActiveCursor,

    #[error("Invalid filter: {0}")]
    Query(#[from] QueryError),

    #[error("Data source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Malformed row from data source: {0}")]
    Decode(#[from] ArchiveError),
}

/// Errors loading or validating [`crate::BrowseConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("page_size must be greater than zero")]
    ZeroPageSize,

    #[error("Invalid sort configuration: {0}")]
    Sort(#[from] QueryError),
}

/// Result type alias for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;
