//! Resource in the hypermedia graph.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde_json::Value as JsonValue;

use super::{Facet, LinksCollection, OperationsCollection, PropertyMap, ResourceCollection, TypesCollection};

static NEXT_BLANK_NODE: AtomicU64 = AtomicU64::new(1);

/// Mint a process-unique blank node identity, e.g. `_:bnode12`.
///
/// The counter is shared by every caller, so identities never repeat within
/// the process lifetime. They mean nothing outside of it.
pub fn blank_node_iri(label: &str) -> String {
    let id = NEXT_BLANK_NODE.fetch_add(1, Ordering::Relaxed);
    format!("_:{label}{id}")
}

/// Whether `iri` is a blank node identity (`_:` prefix).
pub fn is_blank_node(iri: &str) -> bool {
    iri.starts_with("_:")
}

/// A materialized resource.
///
/// Only `iri` and `types` are set by the graph engine. Everything else is
/// filled in by the factory chain and the traversal driver.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    pub iri: String,
    pub types: TypesCollection,
    /// Base URL relative targets resolve against (operations).
    pub base_url: Option<String>,
    /// HTTP method (operations).
    pub method: Option<String>,
    /// Classes an operation expects as its payload.
    pub expects: ResourceCollection,
    pub links: LinksCollection,
    pub operations: OperationsCollection,
    /// Resource an operation or link points at.
    pub target: Option<ResourceHandle>,
    /// Predicate IRI a link was discovered under.
    pub relation: Option<String>,
    /// IRI template source (templated operations and links).
    pub template: Option<String>,
    /// Literal values by predicate.
    pub properties: PropertyMap,
    /// Nested and referenced resources by predicate.
    pub related: hashbrown::HashMap<String, ResourceCollection>,
}

impl Resource {
    pub fn new(iri: impl Into<String>, types: TypesCollection) -> Self {
        Self {
            iri: iri.into(),
            types,
            ..Self::default()
        }
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ty in types {
            self.types.push(ty);
        }
        self
    }

    pub fn is_of_type(&self, type_iri: &str) -> bool {
        self.types.contains(type_iri)
    }

    /// Nested collection addressed by `facet`.
    pub fn facet(&self, facet: Facet) -> &[ResourceHandle] {
        match facet {
            Facet::Expects => self.expects.as_slice(),
            Facet::Links => self.links.as_slice(),
            Facet::Operations => self.operations.as_slice(),
        }
    }

    /// Record a literal value under `predicate`.
    pub fn add_property(&mut self, predicate: impl Into<String>, value: JsonValue) {
        self.properties.entry(predicate.into()).or_default().push(value);
    }

    /// Attach a related resource under `predicate`. Attaching the same
    /// resource twice under one predicate is a no-op.
    pub fn attach(&mut self, predicate: impl Into<String>, resource: ResourceHandle) {
        let related = self.related.entry(predicate.into()).or_default();
        if !related.iter().any(|r| r.ptr_eq(&resource)) {
            related.push(resource);
        }
    }

    pub fn related(&self, predicate: &str) -> &[ResourceHandle] {
        self.related.get(predicate).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn property(&self, predicate: &str) -> &[JsonValue] {
        self.properties.get(predicate).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn into_handle(self) -> ResourceHandle {
        ResourceHandle::new(self)
    }
}

/// Shared handle to a materialized resource.
///
/// Cloning shares the same resource; equality is identity. The IRI is fixed
/// at creation and cached so identity checks never take the lock.
#[derive(Clone)]
pub struct ResourceHandle {
    iri: Arc<str>,
    inner: Arc<RwLock<Resource>>,
}

impl ResourceHandle {
    pub fn new(resource: Resource) -> Self {
        Self {
            iri: Arc::from(resource.iri.as_str()),
            inner: Arc::new(RwLock::new(resource)),
        }
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Resource> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Resource> {
        self.inner.write()
    }

    pub fn is_of_type(&self, type_iri: &str) -> bool {
        self.inner.read().is_of_type(type_iri)
    }

    /// Whether both handles point at the same resource.
    pub fn ptr_eq(&self, other: &ResourceHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Detached copy of the current resource state.
    pub fn snapshot(&self) -> Resource {
        self.inner.read().clone()
    }
}

impl PartialEq for ResourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ResourceHandle {}

impl std::fmt::Debug for ResourceHandle {
    // Graphs may be cyclic; print identity only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ResourceHandle").field(&&*self.iri).finish()
    }
}

impl std::fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

impl From<Resource> for ResourceHandle {
    fn from(resource: Resource) -> Self {
        ResourceHandle::new(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_nodes_are_unique() {
        let a = blank_node_iri("bnode");
        let b = blank_node_iri("bnode");
        assert_ne!(a, b);
        assert!(is_blank_node(&a));
        assert!(a.starts_with("_:bnode"));
    }

    #[test]
    fn test_handle_identity() {
        let a = Resource::new("urn:a", TypesCollection::EMPTY).into_handle();
        let same = a.clone();
        let twin = Resource::new("urn:a", TypesCollection::EMPTY).into_handle();

        assert_eq!(a, same);
        assert_ne!(a, twin);
        assert_eq!(a.iri(), twin.iri());
    }

    #[test]
    fn test_attach_is_idempotent_per_predicate() {
        let target = Resource::new("urn:t", TypesCollection::EMPTY).into_handle();
        let mut resource = Resource::new("urn:r", TypesCollection::EMPTY);
        resource.attach("urn:p", target.clone());
        resource.attach("urn:p", target.clone());
        resource.attach("urn:q", target);

        assert_eq!(resource.related("urn:p").len(), 1);
        assert_eq!(resource.related("urn:q").len(), 1);
        assert!(resource.related("urn:missing").is_empty());
    }

    #[test]
    fn test_debug_prints_identity_only() {
        let handle = Resource::new("urn:self", TypesCollection::EMPTY).into_handle();
        handle.write().attach("urn:loop", handle.clone());
        assert_eq!(format!("{handle:?}"), "ResourceHandle(\"urn:self\")");
    }
}
