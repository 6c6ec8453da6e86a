//! # Archive Crate
//!
//! Storage side of the blog archive browser.
//!
//! ## Main Components
//!
//! - **types**: the [`Post`] record and row decoding at the data-source boundary
//! - **parser**: parse scraped JSON-lines exports into import records
//! - **store**: SQLite `posts` table, idempotent import
//! - **error**: Error types for the crate
//!
//! ## Example Usage
//!
//! ```ignore
//! use archive::ArchiveStore;
//! use std::path::Path;
//!
//! let summary = ArchiveStore::load_from_file(
//!     Path::new("Data/gamedeveloper_blogs.db"),
//!     Path::new("export.jsonl"),
//! )?;
//! println!("{summary}");
//! ```

// Public modules
pub mod error;
pub mod parser;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ArchiveError, Result};
pub use store::{ArchiveStore, ImportSummary, UpsertOutcome};
pub use types::{ImportRecord, Post, Row};
