//! OperationsCollection: operations of a resource, filterable by what they
//! expect and how they are invoked.

use super::collection::filterable_collection;
use super::{Facet, FilterableCollection};
use crate::vocab::hydra;

filterable_collection! {
    /// Collection of operations (`hydra:Operation` resources).
    OperationsCollection
}

impl OperationsCollection {
    /// Operations whose expected classes include `iri`.
    ///
    /// An empty `iri` is not a filter; the collection is returned as is.
    /// Any other value, whitespace included, is matched literally.
    pub fn expecting(&self, iri: &str) -> Self {
        if iri.is_empty() {
            return self.clone();
        }
        self.narrow_filters_with(Facet::Expects, |class| class.iri() == iri)
    }

    /// Operations that are IRI templates and must be expanded before use.
    pub fn with_template(&self) -> Self {
        self.of_type(hydra::IRI_TEMPLATE)
    }

    /// Operations invoked with the given HTTP method (case-insensitive).
    pub fn with_method(&self, method: &str) -> Self {
        if method.is_empty() {
            return self.clone();
        }
        self.filter_by(|operation| {
            operation
                .read()
                .method
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case(method))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Resource, ResourceCollection, ResourceHandle, TypesCollection};

    fn class(iri: &str) -> ResourceHandle {
        Resource::new(iri, TypesCollection::new([hydra::CLASS])).into_handle()
    }

    fn operation(iri: &str, method: &str, expects: &[&ResourceHandle], templated: bool) -> ResourceHandle {
        let mut types = TypesCollection::new([hydra::OPERATION]);
        if templated {
            types.push(hydra::IRI_TEMPLATE);
        }
        let mut resource = Resource::new(iri, types);
        resource.method = Some(method.to_string());
        resource.expects = expects.iter().map(|c| (*c).clone()).collect::<ResourceCollection>();
        resource.into_handle()
    }

    fn sample() -> OperationsCollection {
        let order = class("https://schema.org/Order");
        let person = class("https://schema.org/Person");
        OperationsCollection::new([
            operation("urn:op:create-order", "POST", &[&order], false),
            operation("urn:op:search", "GET", &[], true),
            operation("urn:op:update", "PUT", &[&person, &order], false),
            operation("urn:op:register", "POST", &[&person], true),
        ])
    }

    #[test]
    fn test_expecting_matches_expected_classes() {
        let ops = sample().expecting("https://schema.org/Order");
        assert_eq!(ops.iris(), vec!["urn:op:create-order", "urn:op:update"]);
    }

    #[test]
    fn test_expecting_empty_is_noop() {
        let all = sample();
        assert_eq!(all.expecting(""), all);
    }

    #[test]
    fn test_whitespace_iri_and_method_are_matched_literally() {
        let all = sample();
        for blank in [" ", "   ", "\t"] {
            assert!(all.expecting(blank).is_empty(), "expecting({blank:?})");
            assert!(all.with_method(blank).is_empty(), "with_method({blank:?})");
        }
        assert_eq!(all.with_method(""), all);
    }

    #[test]
    fn test_with_template() {
        let ops = sample().with_template();
        assert_eq!(ops.iris(), vec!["urn:op:search", "urn:op:register"]);
    }

    #[test]
    fn test_chained_filters_stay_operations() {
        let ops: OperationsCollection = sample()
            .expecting("https://schema.org/Person")
            .with_template()
            .with_method("post");
        assert_eq!(ops.iris(), vec!["urn:op:register"]);
    }

    #[test]
    fn test_empty_collection_filters_to_empty() {
        assert!(OperationsCollection::EMPTY.expecting("x:Y").is_empty());
        assert!(OperationsCollection::EMPTY.with_template().is_empty());
    }
}
