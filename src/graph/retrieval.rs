use std::collections::BTreeSet;

use crate::types::RetrievalOperator;

/// Decides whether an entity's tag set satisfies a query.
///
/// Each group is the inclusive descendant closure of one query tag. An entity
/// satisfies a group when it carries at least one tag from it. An empty
/// query matches everything under `Intersection` and nothing under `Union`.
#[must_use]
pub fn matches(
    operator: RetrievalOperator,
    groups: &[BTreeSet<String>],
    entity_tags: &BTreeSet<String>,
) -> bool {
    let hits = |group: &BTreeSet<String>| !group.is_disjoint(entity_tags);
    match operator {
        RetrievalOperator::Union => groups.iter().any(hits),
        RetrievalOperator::Intersection => groups.iter().all(hits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_intersection_needs_a_hit_in_every_group() {
        let animal = set(&["animal", "mammal", "feline", "reptile"]);
        let reptile = set(&["reptile"]);
        let entity = set(&["feline"]);

        assert!(matches(
            RetrievalOperator::Intersection,
            &[animal.clone()],
            &entity
        ));
        assert!(!matches(
            RetrievalOperator::Intersection,
            &[reptile.clone()],
            &entity
        ));
        assert!(!matches(
            RetrievalOperator::Intersection,
            &[animal, reptile],
            &entity
        ));
    }

    #[test]
    fn test_union_needs_a_hit_in_any_group() {
        let entity = set(&["feline"]);

        assert!(matches(
            RetrievalOperator::Union,
            &[set(&["reptile"]), set(&["feline"])],
            &entity
        ));
        assert!(!matches(
            RetrievalOperator::Union,
            &[set(&["reptile"])],
            &entity
        ));
    }

    #[test]
    fn test_empty_query() {
        let entity = set(&["feline"]);

        assert!(matches(RetrievalOperator::Intersection, &[], &entity));
        assert!(!matches(RetrievalOperator::Union, &[], &entity));
    }

    #[test]
    fn test_untagged_entity_never_hits_a_group() {
        let entity = BTreeSet::new();

        assert!(!matches(
            RetrievalOperator::Union,
            &[set(&["a"])],
            &entity
        ));
        assert!(!matches(
            RetrievalOperator::Intersection,
            &[set(&["a"])],
            &entity
        ));
    }
}
