//! Predicate implementations for the query builder.
//!
//! Registered in this order by [`QueryBuilder::new`](crate::QueryBuilder::new),
//! which is also the order their parameters appear in.

pub mod category;
pub mod date_range;
pub mod featured;

// Re-export for convenience
pub use category::CategoryPredicate;
pub use date_range::{DateFromPredicate, DateToPredicate};
pub use featured::FeaturedPredicate;
