//! Core domain types for the blog archive.
//!
//! A [`Post`] is the typed form of one row of the `posts` table. Data sources
//! hand rows back as loosely-typed [`Row`] maps keyed by column name; they are
//! validated into posts here, at the boundary, and never mutated afterwards.

use crate::error::{ArchiveError, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Rows
// =============================================================================

/// One untyped result row, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// Post
// =============================================================================

/// An archived blog post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Post {
    #[serde(deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub authors: String,
    /// Publication date as `YYYY-MM-DD`; empty when the scrape could not parse it.
    #[serde(deserialize_with = "text_or_empty")]
    pub date: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub summary: String,
    #[serde(deserialize_with = "text_or_empty")]
    pub category_name: String,
    /// Absolute URL of the post; unique across the archive.
    pub link: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(deserialize_with = "featured_flag")]
    pub featured: bool,
}

impl Post {
    /// Validate a data-source row into a post.
    ///
    /// Every post column except `Thumbnail` must be present;
    /// `Featured` accepts booleans as well as SQLite's `0`/`1` integers.
    pub fn from_row(row: Row) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(row))
            .map_err(|e| ArchiveError::RowDecode(e.to_string()))
    }
}

// =============================================================================
// Import records
// =============================================================================

/// A post as produced by the export parser, plus the columns that are stored
/// but never selected by browse queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub post: Post,
    pub time_to_read: String,
}

// =============================================================================
// Field decoders
// =============================================================================

fn text_or_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
    Text(String),
}

fn featured_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Flag::Bool(b)) => Ok(b),
        Some(Flag::Int(i)) => Ok(i != 0),
        Some(Flag::Text(s)) => match s.to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!("invalid Featured flag: {other}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test rows must be objects"),
        }
    }

    #[test]
    fn test_from_row_sqlite_shape() {
        let post = Post::from_row(row(json!({
            "Title": "Designing Boss Fights",
            "Authors": "Jane Doe, John Roe",
            "Date": "2021-04-02",
            "Summary": "Notes on pacing",
            "CategoryName": "Design",
            "Link": "https://www.gamedeveloper.com/design/boss-fights",
            "Thumbnail": null,
            "Featured": 1
        })))
        .unwrap();

        assert_eq!(post.title, "Designing Boss Fights");
        assert_eq!(post.category_name, "Design");
        assert_eq!(post.thumbnail, None);
        assert!(post.featured);
    }

    #[test]
    fn test_from_row_null_date_becomes_empty() {
        let post = Post::from_row(row(json!({
            "Title": "Untitled",
            "Authors": "",
            "Date": null,
            "Summary": "",
            "CategoryName": "Art",
            "Link": "https://example.com/a",
            "Featured": false
        })))
        .unwrap();

        assert_eq!(post.date, "");
        assert!(!post.featured);
    }

    #[test]
    fn test_from_row_rejects_missing_link() {
        let result = Post::from_row(row(json!({
            "Title": "No link",
            "Authors": "",
            "Date": "2020-01-01",
            "Summary": "",
            "CategoryName": "Art",
            "Featured": 0
        })));

        assert!(matches!(result, Err(ArchiveError::RowDecode(_))));
    }

    #[test]
    fn test_from_row_rejects_garbage_flag() {
        let result = Post::from_row(row(json!({
            "Title": "t",
            "Authors": "a",
            "Date": "2020-01-01",
            "Summary": "s",
            "CategoryName": "Art",
            "Link": "https://example.com/b",
            "Featured": "sometimes"
        })));

        assert!(result.is_err());
    }
}
