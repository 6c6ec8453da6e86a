//! Inclusive date bounds.
//!
//! Dates are stored as `YYYY-MM-DD` text and compared lexicographically, so a
//! bound only makes sense if it is a prefix-shaped ISO date. Anything else is
//! rejected rather than silently compared as text.

use crate::error::{QueryError, Result};
use crate::filter::FilterState;
use crate::statement::{SqlParam, WhereClause};
use crate::traits::Predicate;

/// `Date >= ?` when `date_from` is set.
pub struct DateFromPredicate;

/// `Date <= ?` when `date_to` is set.
pub struct DateToPredicate;

impl Predicate for DateFromPredicate {
    fn name(&self) -> &str {
        "DateFromPredicate"
    }

    fn apply(&self, filter: &FilterState, clause: &mut WhereClause) -> Result<()> {
        push_bound(clause, "date_from", "Date >= ?", &filter.date_from)
    }
}

impl Predicate for DateToPredicate {
    fn name(&self) -> &str {
        "DateToPredicate"
    }

    fn apply(&self, filter: &FilterState, clause: &mut WhereClause) -> Result<()> {
        push_bound(clause, "date_to", "Date <= ?", &filter.date_to)
    }
}

fn push_bound(
    clause: &mut WhereClause,
    field: &'static str,
    condition: &str,
    value: &str,
) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    if !is_iso_date(value) {
        return Err(QueryError::InvalidDate {
            field,
            value: value.to_string(),
        });
    }
    clause.push(condition, [SqlParam::Text(value.to_string())]);
    Ok(())
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
pub fn is_iso_date(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());

    match parts.as_slice() {
        [year] => digits(year, 4),
        [year, month] => digits(year, 4) && digits(month, 2),
        [year, month, day] => digits(year, 4) && digits(month, 2) && digits(day, 2),
        _ => false,
    }
}
