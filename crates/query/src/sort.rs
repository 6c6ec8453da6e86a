//! Sort allow-list.
//!
//! Column names end up in statement text as identifiers, so they are only
//! accepted when they appear verbatim in the configured allow-list. The
//! allow-list itself only admits plain identifiers.

use crate::error::{QueryError, Result};
use crate::filter::{FilterState, SortDirection};

/// Sortable columns used when nothing else is configured.
pub const DEFAULT_SORT_COLUMNS: [&str; 4] = ["Date", "Title", "Authors", "CategoryName"];

/// A validated `ORDER BY` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortClause {
    column: String,
    direction: SortDirection,
}

impl SortClause {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// `"<column> <ASC|DESC>"`, safe to interpolate.
    pub fn to_sql(&self) -> String {
        format!("{} {}", self.column, self.direction.as_sql())
    }
}

/// The set of columns a caller may sort by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortAllowList {
    columns: Vec<String>,
}

impl SortAllowList {
    /// Build an allow-list, rejecting anything that is not a plain identifier.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for column in &columns {
            validate_identifier(column)?;
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Validate a column/direction pair.
    pub fn validate(&self, column: &str, direction: SortDirection) -> Result<SortClause> {
        if !self.contains(column) {
            return Err(QueryError::InvalidSort(format!(
                "{} {}",
                column,
                direction.as_sql()
            )));
        }
        Ok(SortClause {
            column: column.to_string(),
            direction,
        })
    }

    /// Validate the sort carried by a filter state.
    pub fn validate_filter(&self, filter: &FilterState) -> Result<SortClause> {
        self.validate(&filter.sort_column, filter.sort_direction)
    }
}

impl Default for SortAllowList {
    fn default() -> Self {
        Self {
            columns: DEFAULT_SORT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Only ASCII letters, digits and underscores, not starting with a digit.
fn validate_identifier(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(QueryError::InvalidIdentifier(name.to_string()))
    }
}
