//! Parser for scraped blog-feed exports.
//!
//! An export is JSON lines, one feed entry per line, in the shape the blog's
//! listing endpoint returns:
//!
//! ```text
//! {"articleName": "...", "articleUrl": "/design/...", "contributors": [{"name": "..."}],
//!  "date": "Mar 17, 2019", "articleSummary": "...", "thumbnail": {"src": "..."},
//!  "timeRead": "5 min read", "categoryName": "Design", "featured": true}
//! ```
//!
//! Entries are cleaned and normalized into [`ImportRecord`]s ready for the
//! store. Lines are independent, so they are parsed in parallel with Rayon.

use crate::error::{ArchiveError, Result};
use crate::types::{ImportRecord, Post};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Origin prepended to relative article URLs.
pub const SITE_ORIGIN: &str = "https://www.gamedeveloper.com";

/// Placeholder stored for text fields the feed omitted.
const MISSING: &str = "N/A";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScrapedPost {
    article_name: Option<String>,
    article_url: Option<String>,
    #[serde(default)]
    contributors: Vec<Contributor>,
    date: Option<String>,
    article_summary: Option<String>,
    thumbnail: Option<Thumbnail>,
    time_read: Option<serde_json::Value>,
    category_name: Option<String>,
    #[serde(default)]
    featured: bool,
}

#[derive(Debug, Deserialize)]
struct Contributor {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    src: Option<String>,
}

/// Parse an export file from disk.
pub fn parse_export(path: &Path) -> Result<Vec<ImportRecord>> {
    if !path.exists() {
        return Err(ArchiveError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_export_str(&content, &file)
}

/// Parse export content. `file` is only used in error messages.
///
/// Blank lines are skipped; output order follows input order.
pub fn parse_export_str(content: &str, file: &str) -> Result<Vec<ImportRecord>> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    lines
        .par_iter()
        .map(|&(line_no, line)| parse_line(line, file, line_no))
        .collect()
}

fn parse_line(line: &str, file: &str, line_no: usize) -> Result<ImportRecord> {
    let scraped: ScrapedPost =
        serde_json::from_str(line).map_err(|e| ArchiveError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: e.to_string(),
        })?;

    let url = scraped
        .article_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ArchiveError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing articleUrl".to_string(),
        })?;

    let authors = scraped
        .contributors
        .iter()
        .map(|c| clean_text(&c.name))
        .collect::<Vec<_>>()
        .join(", ");

    let post = Post {
        title: clean_or_missing(scraped.article_name.as_deref()),
        authors,
        date: scraped.date.as_deref().and_then(format_date).unwrap_or_default(),
        summary: clean_or_missing(scraped.article_summary.as_deref()),
        category_name: clean_or_missing(scraped.category_name.as_deref()),
        link: absolute_link(url.trim()),
        thumbnail: scraped.thumbnail.and_then(|t| t.src),
        featured: scraped.featured,
    };

    let time_to_read = match scraped.time_read {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => MISSING.to_string(),
    };

    Ok(ImportRecord { post, time_to_read })
}

/// Strip characters that do not render, such as control codes and stray
/// line breaks inside titles.
pub fn clean_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

fn clean_or_missing(text: Option<&str>) -> String {
    text.map(clean_text).unwrap_or_else(|| MISSING.to_string())
}

/// Normalize a feed date such as `"Mar 17, 2019"` to `"2019-03-17"`.
///
/// Returns `None` when the date does not parse; such posts are stored
/// without a date and never match a date-bounded search.
pub fn format_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%b %d, %Y")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn absolute_link(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("{SITE_ORIGIN}{url}")
    }
}
