//! SQLite-backed archive store.
//!
//! Owns the `posts` table the browser queries. Ingestion is idempotent: the
//! link is the primary key, re-importing a post never duplicates it, and a
//! post seen again in the featured feed is promoted to featured.

use crate::error::{ArchiveError, Result};
use crate::parser;
use crate::types::ImportRecord;
use chrono::{DateTime, Local};
use rusqlite::{Connection, OptionalExtension, params};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS posts (
        Title TEXT,
        Link TEXT PRIMARY KEY,
        Authors TEXT,
        Date TEXT,
        Summary TEXT,
        Thumbnail TEXT,
        TimeToRead TEXT,
        CategoryName TEXT,
        Featured BOOLEAN
    );
    CREATE INDEX IF NOT EXISTS idx_date ON posts(Date);
    CREATE INDEX IF NOT EXISTS idx_title ON posts(Title);
    CREATE INDEX IF NOT EXISTS idx_authors ON posts(Authors);
";

/// What happened to a single record during import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The link was new and the post was stored.
    Inserted,
    /// The link existed as a regular post and is now featured.
    Promoted,
    /// The link existed and nothing changed.
    Unchanged,
}

/// Totals for one import run.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub inserted: usize,
    pub promoted: usize,
    pub unchanged: usize,
    /// Rows in the table once the import committed.
    pub total_posts: u64,
    pub completed_at: DateTime<Local>,
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Last updated on: {}. Total posts in database: {}.",
            self.completed_at.format("%Y-%m-%d %H:%M:%S"),
            self.total_posts
        )
    }
}

/// Read-write handle on an archive database.
#[derive(Debug)]
pub struct ArchiveStore {
    conn: Connection,
}

impl ArchiveStore {
    /// Open (or create) an archive file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Private in-memory archive, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Create the `posts` table and its indexes if they are missing.
    pub fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Store one record, honouring link uniqueness and featured promotion.
    pub fn upsert(&self, record: &ImportRecord) -> Result<UpsertOutcome> {
        upsert_with(&self.conn, record)
    }

    /// Store a batch of records in a single transaction.
    ///
    /// Either every record is applied or none is: the first failing upsert
    /// rolls the whole batch back.
    ///
    /// # Arguments
    /// * `records` - Parsed export records, in file order
    ///
    /// # Returns
    /// * `Ok(ImportSummary)` - Per-outcome counts and the resulting table size
    /// * `Err` - If a record has no link or SQLite rejects a write
    pub fn import(&mut self, records: &[ImportRecord]) -> Result<ImportSummary> {
        let tx = self.conn.transaction()?;
        let (mut inserted, mut promoted, mut unchanged) = (0, 0, 0);

        for record in records {
            match upsert_with(&tx, record)? {
                UpsertOutcome::Inserted => inserted += 1,
                UpsertOutcome::Promoted => promoted += 1,
                UpsertOutcome::Unchanged => unchanged += 1,
            }
        }
        tx.commit()?;

        let summary = ImportSummary {
            inserted,
            promoted,
            unchanged,
            total_posts: self.count()?,
            completed_at: Local::now(),
        };
        info!(
            "Imported {} records: {} inserted, {} promoted, {} unchanged",
            records.len(),
            inserted,
            promoted,
            unchanged
        );
        Ok(summary)
    }

    /// Number of posts in the archive.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Distinct category names, sorted.
    pub fn categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT CategoryName FROM posts WHERE CategoryName IS NOT NULL ORDER BY CategoryName",
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Parse an export file and import it into the archive at `db_path`.
    pub fn load_from_file(db_path: &Path, export_path: &Path) -> Result<ImportSummary> {
        info!("Loading export {:?} into {:?}", export_path, db_path);
        let records = parser::parse_export(export_path)?;
        let mut store = Self::open(db_path)?;
        store.import(&records)
    }

    /// Give up the store and keep its connection, e.g. to hand it to a
    /// query source.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

fn upsert_with(conn: &Connection, record: &ImportRecord) -> Result<UpsertOutcome> {
    let post = &record.post;
    if post.link.trim().is_empty() {
        return Err(ArchiveError::InvalidValue {
            field: "Link".to_string(),
            value: post.link.clone(),
        });
    }

    let existing: Option<bool> = conn
        .query_row(
            "SELECT Featured FROM posts WHERE Link = ?1",
            params![post.link],
            |row| row.get::<_, Option<bool>>(0),
        )
        .optional()?
        .map(|featured| featured.unwrap_or(false));

    match existing {
        Some(true) => Ok(UpsertOutcome::Unchanged),
        Some(false) if post.featured => {
            conn.execute(
                "UPDATE posts SET Featured = 1 WHERE Link = ?1",
                params![post.link],
            )?;
            debug!("Promoted existing post to featured: {}", post.link);
            Ok(UpsertOutcome::Promoted)
        }
        Some(false) => Ok(UpsertOutcome::Unchanged),
        None => {
            let date = (!post.date.is_empty()).then_some(post.date.as_str());
            conn.execute(
                "INSERT INTO posts (Title, Link, Authors, Date, Summary, Thumbnail, TimeToRead, CategoryName, Featured)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    post.title,
                    post.link,
                    post.authors,
                    date,
                    post.summary,
                    post.thumbnail,
                    record.time_to_read,
                    post.category_name,
                    post.featured,
                ],
            )?;
            Ok(UpsertOutcome::Inserted)
        }
    }
}
