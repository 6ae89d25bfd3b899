//! Navigable links of a resource.

use super::FilterableCollection;
use super::collection::filterable_collection;

filterable_collection! {
    /// Collection of links; each item carries the predicate it was found
    /// under in `relation` and what it points at in `target`.
    LinksCollection
}

impl LinksCollection {
    /// Links discovered under the predicate `iri`. An empty `iri` is not a
    /// filter.
    pub fn with_relation_of(&self, iri: &str) -> Self {
        if iri.is_empty() {
            return self.clone();
        }
        self.filter_by(|link| link.read().relation.as_deref() == Some(iri))
    }

    /// Links pointing at the resource `iri`.
    pub fn with_target_of(&self, iri: &str) -> Self {
        self.filter_by(|link| link.read().target.as_ref().is_some_and(|t| t.iri() == iri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, ResourceHandle, TypesCollection};
    use crate::vocab::hydra;

    fn link(iri: &str, relation: &str, target: &str) -> ResourceHandle {
        let mut resource = Resource::new(iri, TypesCollection::new([hydra::LINK]));
        resource.relation = Some(relation.to_string());
        resource.target = Some(Resource::new(target, TypesCollection::EMPTY).into_handle());
        resource.into_handle()
    }

    #[test]
    fn test_with_relation_of() {
        let links = LinksCollection::new([
            link("_:l1", "x:next", "urn:page:2"),
            link("_:l2", "x:first", "urn:page:1"),
            link("_:l3", "x:next", "urn:page:3"),
        ]);
        assert_eq!(links.with_relation_of("x:next").iris(), vec!["_:l1", "_:l3"]);
        assert_eq!(links.with_relation_of("").len(), 3);
        assert!(links.with_relation_of("  ").is_empty());
        assert_eq!(links.with_target_of("urn:page:1").iris(), vec!["_:l2"]);
        assert_eq!(links.of_type(hydra::LINK).len(), 3);
    }
}
