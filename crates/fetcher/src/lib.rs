//! # Fetcher Crate
//!
//! Paginated, cancellation-aware access to the blog archive.
//!
//! ## Main Components
//!
//! - **source**: the [`DataSource`] trait every backing store implements
//! - **sqlite**: [`SqliteSource`], the archive database as a data source
//! - **cursor**: [`PaginationCursor`], offset bookkeeping for one result stream
//! - **page_fetcher**: [`PageFetcher`], `reset` / `more` with stale-result discard
//! - **config**: [`BrowseConfig`], layered TOML + environment configuration
//! - **error**: Error types for the crate
//!
//! ## Example Usage
//!
//! ```ignore
//! use fetcher::{BrowseConfig, PageFetcher, SqliteSource};
//! use query::FilterState;
//! use std::sync::Arc;
//!
//! let config = BrowseConfig::load(None)?;
//! let source = SqliteSource::open_read_only(&config.database)?;
//! let fetcher = PageFetcher::from_config(Arc::new(source), &config)?;
//!
//! let first = fetcher.reset(FilterState::default().with_text("shader")).await?;
//! let second = fetcher.more().await?;
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod page_fetcher;
pub mod source;
pub mod sqlite;

pub use config::{BrowseConfig, SortConfig};
pub use cursor::PaginationCursor;
pub use error::{ConfigError, FetchError, Result};
pub use page_fetcher::{Page, PageFetcher, PageKind};
pub use source::{DataSource, SourceError};
pub use sqlite::SqliteSource;
