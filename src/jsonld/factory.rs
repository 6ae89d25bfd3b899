//! Factory registry: ordered resource augmentation.
//!
//! A factory takes a bare `{iri, types}` resource and returns it enriched
//! (operations, links, targets...). Every entry whose predicate matches the
//! resource *as enriched so far* runs, in registration order, so a factory
//! may add a type that switches on a later one.

use super::ProcessingState;
use crate::model::Resource;

/// Transform applied to a resource under construction.
pub type Factory<C> = Box<dyn Fn(Resource, &C, &ProcessingState<'_, C>) -> Resource>;

type Matcher = Box<dyn Fn(&Resource) -> bool>;

struct FactoryEntry<C> {
    name: String,
    matches: Matcher,
    transform: Factory<C>,
}

/// Ordered list of `(predicate, transform)` pairs.
pub struct FactoryRegistry<C> {
    entries: Vec<FactoryEntry<C>>,
}

impl<C> FactoryRegistry<C> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Run `factory` for resources typed `type_iri`.
    pub fn register<F>(&mut self, type_iri: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(Resource, &C, &ProcessingState<'_, C>) -> Resource + 'static,
    {
        let type_iri = type_iri.into();
        let matches_type = type_iri.clone();
        self.entries.push(FactoryEntry {
            name: type_iri,
            matches: Box::new(move |resource: &Resource| resource.is_of_type(&matches_type)),
            transform: Box::new(factory),
        });
        self
    }

    /// Run `factory` for resources satisfying `predicate`.
    pub fn register_when<P, F>(&mut self, name: impl Into<String>, predicate: P, factory: F) -> &mut Self
    where
        P: Fn(&Resource) -> bool + 'static,
        F: Fn(Resource, &C, &ProcessingState<'_, C>) -> Resource + 'static,
    {
        self.entries.push(FactoryEntry {
            name: name.into(),
            matches: Box::new(predicate),
            transform: Box::new(factory),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry names (type IRIs for [`register`](Self::register)), in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Thread `resource` through every matching entry.
    pub fn apply(&self, resource: Resource, client: &C, state: &ProcessingState<'_, C>) -> Resource {
        self.entries.iter().fold(resource, |resource, entry| {
            if (entry.matches)(&resource) {
                tracing::trace!(iri = %resource.iri, factory = %entry.name, "applying factory");
                (entry.transform)(resource, client, state)
            } else {
                resource
            }
        })
    }
}

impl<C> Default for FactoryRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for FactoryRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinksPolicy;
    use serde_json::json;

    #[test]
    fn test_registration_order_is_kept() {
        let mut registry = FactoryRegistry::<()>::new();
        registry
            .register("x:B", |r, _, _| r)
            .register_when("anything", |_| true, |r, _, _| r)
            .register("x:A", |r, _, _| r);

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["x:B", "anything", "x:A"]);
        assert_eq!(registry.len(), 3);
        assert!(FactoryRegistry::<()>::default().is_empty());
    }

    #[test]
    fn test_only_matching_entries_run() {
        let mut registry = FactoryRegistry::<u32>::new();
        registry
            .register("x:Operation", |mut r, client, _| {
                r.method = Some(format!("client-{client}"));
                r
            })
            .register_when("blank", |r| r.iri.starts_with("_:"), |mut r, _, _| {
                r.add_property("x:blank", json!(true));
                r
            });

        let state = ProcessingState::new(json!([]), "https://a.example/", 7u32, LinksPolicy::Strict).unwrap();
        let op = registry.apply(
            Resource::new("urn:op", crate::model::TypesCollection::new(["x:Operation"])),
            state.client(),
            &state,
        );
        assert_eq!(op.method.as_deref(), Some("client-7"));
        assert!(op.property("x:blank").is_empty());

        let other = registry.apply(Resource::new("_:b1", Default::default()), state.client(), &state);
        assert!(other.method.is_none());
        assert_eq!(other.property("x:blank"), &[json!(true)]);
    }
}
