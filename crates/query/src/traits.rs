//! Core traits for statement construction.
//!
//! Optional `WHERE` conditions are expressed as [`Predicate`]s so the
//! builder can compose them and new filters can be added without touching
//! the builder itself.

use crate::error::Result;
use crate::filter::FilterState;
use crate::statement::WhereClause;

/// One optional `AND` condition.
///
/// A predicate inspects the filter state and pushes nothing when its value is
/// unset. Absent predicates contribute neither text nor parameters; they are
/// never rendered as a wildcard.
pub trait Predicate: Send + Sync {
    /// Returns the name of this predicate (for logging/debugging)
    fn name(&self) -> &str;

    /// Push this predicate's condition, if any.
    ///
    /// # Returns
    /// * `Err` - If the filter value is malformed
    fn apply(&self, filter: &FilterState, clause: &mut WhereClause) -> Result<()>;
}
