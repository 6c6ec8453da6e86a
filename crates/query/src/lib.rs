//! Query construction for the blog archive browser.
//!
//! This crate provides:
//! - [`FilterState`] and the typed values parsed from loosely-typed inputs
//! - [`SortAllowList`] guarding the one identifier position in the statement
//! - the [`Predicate`] trait and the standard optional predicates
//! - [`QueryBuilder`], a pure function from filter state to [`Statement`]
//!
//! Nothing here performs I/O.
//!
//! ## Example Usage
//! ```ignore
//! use query::{FilterState, Featured, QueryBuilder};
//!
//! let filter = FilterState::default()
//!     .with_text("procedural")
//!     .with_featured(Featured::FeaturedOnly);
//!
//! let statement = QueryBuilder::new().build(&filter, 20, 0)?;
//! assert_eq!(statement.placeholder_count(), statement.params().len());
//! ```

pub mod error;
pub mod filter;
pub mod predicates;
pub mod query_builder;
pub mod sort;
pub mod statement;
pub mod traits;

// Re-export main types
pub use error::{QueryError, Result};
pub use filter::{ALL_CATEGORIES, Featured, FilterState, SortDirection};
pub use query_builder::{POSTS_TABLE, QueryBuilder};
pub use sort::{DEFAULT_SORT_COLUMNS, SortAllowList, SortClause};
pub use statement::{SqlParam, Statement, WhereClause};
pub use traits::Predicate;
