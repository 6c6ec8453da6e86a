//! Filter state for one search invocation.
//!
//! Inputs arrive loosely typed (text boxes, select values). They are parsed
//! into [`FilterState`] once and the value is then treated as frozen: a new
//! search means a new filter state, never an edit of the current one.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category sentinel that disables the category predicate.
pub const ALL_CATEGORIES: &str = "All";

/// Tri-state featured filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Featured {
    #[default]
    All,
    #[serde(rename = "featured")]
    FeaturedOnly,
    NotFeatured,
}

impl Featured {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::FeaturedOnly => "featured",
            Self::NotFeatured => "not_featured",
        }
    }
}

impl FromStr for Featured {
    type Err = QueryError;

    /// Accepts the select-box tokens `all`, `featured` and `not_featured`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "featured" => Ok(Self::FeaturedOnly),
            "not_featured" => Ok(Self::NotFeatured),
            _ => Err(QueryError::InvalidFeatured(s.to_string())),
        }
    }
}

impl fmt::Display for Featured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction. Only these two tokens ever reach statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(Self::Ascending),
            "DESC" | "DESCENDING" => Ok(Self::Descending),
            _ => Err(QueryError::InvalidSort(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Everything that selects and orders one result stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    /// Case-insensitive substring matched against title, summary and authors.
    pub text: String,
    /// Exact category, or [`ALL_CATEGORIES`].
    pub category: String,
    /// Inclusive lower date bound; empty for none.
    pub date_from: String,
    /// Inclusive upper date bound; empty for none.
    pub date_to: String,
    pub featured: Featured,
    pub sort_column: String,
    pub sort_direction: SortDirection,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            text: String::new(),
            category: ALL_CATEGORIES.to_string(),
            date_from: String::new(),
            date_to: String::new(),
            featured: Featured::All,
            sort_column: "Date".to_string(),
            sort_direction: SortDirection::Descending,
        }
    }
}

impl FilterState {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_date_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.date_from = from.into();
        self.date_to = to.into();
        self
    }

    pub fn with_featured(mut self, featured: Featured) -> Self {
        self.featured = featured;
        self
    }

    pub fn with_sort(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_column = column.into();
        self.sort_direction = direction;
        self
    }

    /// True when the category predicate applies. An empty category is
    /// treated like the `All` sentinel.
    pub fn has_category(&self) -> bool {
        !self.category.is_empty() && self.category != ALL_CATEGORIES
    }
}
