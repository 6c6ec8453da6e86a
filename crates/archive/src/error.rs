//! Error types for the archive crate.
//!
//! Covers the three places archive data can go wrong: reading the scraped
//! export, talking to the SQLite file, and decoding rows handed back by a
//! data source into typed [`Post`](crate::Post) values.

use thiserror::Error;

/// Errors that can occur while parsing, storing or decoding archived posts.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Export file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The SQLite archive rejected a statement
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Line in an export file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had a value the archive cannot store
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A row returned by a data source did not match the post shape
    #[error("Row could not be decoded into a post: {0}")]
    RowDecode(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ArchiveError>;
