//! The QueryBuilder turns a filter state into a parameterized statement.
//!
//! The statement always has the same skeleton:
//!
//! ```text
//! SELECT <post columns> FROM posts
//! WHERE (<text match on Title, Summary, Authors>) [AND <predicate>]...
//! ORDER BY <column> <ASC|DESC> LIMIT ? OFFSET ?
//! ```
//!
//! Parameters follow placeholder order: the text needle three times, then
//! each registered predicate's parameters, then limit, then offset.

use crate::error::Result;
use crate::filter::FilterState;
use crate::predicates::{CategoryPredicate, DateFromPredicate, DateToPredicate, FeaturedPredicate};
use crate::sort::{SortAllowList, SortClause};
use crate::statement::{SqlParam, Statement, WhereClause};
use crate::traits::Predicate;
use tracing::debug;

/// Table holding the archive.
pub const POSTS_TABLE: &str = "posts";

/// Select list for post queries; matches the fields of an archived post.
pub const SELECT_LIST: &str = "Title, Authors, Date, Summary, CategoryName, Link, Thumbnail, Featured";

const TEXT_MATCH: &str = "(Title LIKE '%' || ? || '%' ESCAPE '\\' \
     OR Summary LIKE '%' || ? || '%' ESCAPE '\\' \
     OR Authors LIKE '%' || ? || '%' ESCAPE '\\')";

/// Builds post queries from filter states.
///
/// ## Usage
/// ```ignore
/// let builder = QueryBuilder::new();
/// let statement = builder.build(&filter, 20, 0)?;
/// let rows = source.query(statement.sql(), statement.params()).await?;
/// ```
pub struct QueryBuilder {
    allow_list: SortAllowList,
    predicates: Vec<Box<dyn Predicate>>,
}

impl QueryBuilder {
    /// Builder with the default sort allow-list and the standard predicates
    /// (category, date from, date to, featured).
    pub fn new() -> Self {
        Self::with_allow_list(SortAllowList::default())
    }

    /// Standard predicates with a configured allow-list.
    pub fn with_allow_list(allow_list: SortAllowList) -> Self {
        Self::bare(allow_list)
            .add_predicate(CategoryPredicate)
            .add_predicate(DateFromPredicate)
            .add_predicate(DateToPredicate)
            .add_predicate(FeaturedPredicate)
    }

    /// Only the text match; no optional predicates.
    pub fn bare(allow_list: SortAllowList) -> Self {
        Self {
            allow_list,
            predicates: Vec::new(),
        }
    }

    /// Add a predicate (builder pattern). Its condition is appended after the
    /// ones already registered.
    pub fn add_predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn allow_list(&self) -> &SortAllowList {
        &self.allow_list
    }

    /// Check the filter's sort against the allow-list without building.
    pub fn validate_sort(&self, filter: &FilterState) -> Result<SortClause> {
        self.allow_list.validate_filter(filter)
    }

    /// Build the page query for `filter`.
    ///
    /// The sort is validated before anything else, so an invalid sort never
    /// produces statement text. Output is deterministic for equal inputs.
    ///
    /// # Arguments
    /// * `filter` - The filter state to translate
    /// * `limit` - Rows per page, bound as the second-to-last parameter
    /// * `offset` - Rows to skip, bound as the last parameter
    ///
    /// # Returns
    /// * `Ok(Statement)` - SQL text plus parameters in placeholder order
    /// * `Err(QueryError::InvalidSort)` - If the sort column is not allowed
    /// * `Err(QueryError::InvalidDate)` - If a date bound is malformed
    pub fn build(&self, filter: &FilterState, limit: u32, offset: u64) -> Result<Statement> {
        let sort = self.validate_sort(filter)?;

        let mut clause = WhereClause::new();
        let needle = escape_like(&filter.text);
        clause.push(
            TEXT_MATCH,
            [
                SqlParam::Text(needle.clone()),
                SqlParam::Text(needle.clone()),
                SqlParam::Text(needle),
            ],
        );

        for predicate in &self.predicates {
            predicate.apply(filter, &mut clause)?;
            debug!(
                "Applied predicate: {} (conditions: {})",
                predicate.name(),
                clause.len()
            );
        }

        let (conditions, mut params) = clause.into_parts();
        let sql = format!(
            "SELECT {SELECT_LIST} FROM {POSTS_TABLE} WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            conditions.join(" AND "),
            sort.to_sql()
        );
        params.push(SqlParam::Int(i64::from(limit)));
        params.push(SqlParam::Int(i64::try_from(offset).unwrap_or(i64::MAX)));

        Ok(Statement::new(sql, params))
    }

    /// Distinct category names, for populating a category picker.
    pub fn build_categories(&self) -> Statement {
        Statement::new(
            format!(
                "SELECT DISTINCT CategoryName FROM {POSTS_TABLE} \
                 WHERE CategoryName IS NOT NULL ORDER BY CategoryName"
            ),
            Vec::new(),
        )
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape `LIKE` wildcards so the needle matches as a plain substring.
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
