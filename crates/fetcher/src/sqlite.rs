//! SQLite-backed data source.
//!
//! `rusqlite` is synchronous, so each query runs on the blocking pool via
//! `spawn_blocking` and the connection sits behind a mutex.

use crate::source::{DataSource, SourceError};
use archive::Row;
use async_trait::async_trait;
use query::SqlParam;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, OpenFlags};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Queries an archive database file (or any connection with a `posts` table).
#[derive(Clone)]
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    /// Open an archive file read-only.
    pub fn open_read_only(path: &Path) -> Result<Self, SourceError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!("Opened archive {:?} read-only", path);
        Ok(Self::from_connection(conn))
    }

    /// Wrap an existing connection, e.g. one handed over by the archive store.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    async fn query(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>, SourceError> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        let values: Vec<SqlValue> = params.iter().map(to_sql_value).collect();

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| SourceError::Unavailable("connection mutex poisoned".to_string()))?;
            run_query(&conn, &sql, values)
        })
        .await?
    }
}

fn to_sql_value(param: &SqlParam) -> SqlValue {
    match param {
        SqlParam::Text(s) => SqlValue::Text(s.clone()),
        SqlParam::Int(i) => SqlValue::Integer(*i),
    }
}

fn run_query(conn: &Connection, sql: &str, values: Vec<SqlValue>) -> Result<Vec<Row>, SourceError> {
    let mut stmt = conn.prepare_cached(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(values))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = Row::new();
        for (idx, name) in names.iter().enumerate() {
            map.insert(name.clone(), to_json(row.get_ref(idx)?));
        }
        out.push(map);
    }
    Ok(out)
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        // Nothing in the posts table is a blob.
        ValueRef::Blob(_) => Value::Null,
    }
}
