//! Exact category match.

use crate::error::Result;
use crate::filter::FilterState;
use crate::statement::{SqlParam, WhereClause};
use crate::traits::Predicate;

/// `CategoryName = ?`, skipped for the `All` sentinel.
pub struct CategoryPredicate;

impl Predicate for CategoryPredicate {
    fn name(&self) -> &str {
        "CategoryPredicate"
    }

    fn apply(&self, filter: &FilterState, clause: &mut WhereClause) -> Result<()> {
        if filter.has_category() {
            clause.push(
                "CategoryName = ?",
                [SqlParam::Text(filter.category.clone())],
            );
        }
        Ok(())
    }
}
