//! Featured tri-state.

use crate::error::Result;
use crate::filter::{Featured, FilterState};
use crate::statement::WhereClause;
use crate::traits::Predicate;

/// Inlines `Featured = 1` or `Featured = 0`. The literal comes from the enum,
/// never from user text, so it takes no parameter.
pub struct FeaturedPredicate;

impl Predicate for FeaturedPredicate {
    fn name(&self) -> &str {
        "FeaturedPredicate"
    }

    fn apply(&self, filter: &FilterState, clause: &mut WhereClause) -> Result<()> {
        match filter.featured {
            Featured::All => {}
            Featured::FeaturedOnly => clause.push_literal("Featured = 1"),
            Featured::NotFeatured => clause.push_literal("Featured = 0"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(featured: Featured) -> Vec<String> {
        let mut clause = WhereClause::new();
        let filter = FilterState::default().with_featured(featured);
        FeaturedPredicate.apply(&filter, &mut clause).unwrap();
        let (conditions, params) = clause.into_parts();
        assert!(params.is_empty());
        conditions
    }

    #[test]
    fn test_featured_states() {
        assert!(conditions(Featured::All).is_empty());
        assert_eq!(conditions(Featured::FeaturedOnly), vec!["Featured = 1"]);
        assert_eq!(conditions(Featured::NotFeatured), vec!["Featured = 0"]);
    }
}
