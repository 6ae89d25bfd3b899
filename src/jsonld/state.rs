//! Traversal context of one payload.
//!
//! The root context owns everything shared by the traversal; every child
//! context made with [`ProcessingState::copy_for`] borrows it:
//!
//! - **resources**: IRI → the one [`ResourceHandle`] for that IRI
//! - **hypermedia**: resources in discovery order, plus the set of IRIs
//!   marked owned (embedded) that the final view drops
//! - **notifications**: IRI → callbacks waiting for that IRI to materialize
//! - **raw index**: IRI → position of its node in the payload (misses included)
//!
//! Anonymous node objects in the payload are labeled with a fresh blank node
//! `@id` when the root is created, so every context reaching one of them (or
//! a clone of it) sees the same identity. A node without `@id` handed in by a
//! caller gets one blank identity per context that provides it.
//!
//! ## Limitations
//!
//! - **Frozen hypermedia**: [`ProcessingState::hypermedia`] is computed once.
//!   Resources marked owned after the first read stay in the view.
//! - **Dangling references**: callbacks registered for an IRI that is never
//!   materialized stay queued until the traversal is dropped. Nothing reports
//!   them.
//!
//! Access is single-threaded; the shared structures use `RefCell` and no
//! borrow is held while factories or callbacks run, so both may re-enter
//! the state freely.

use std::cell::{OnceCell, RefCell};
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use serde_json::Value as JsonValue;
use url::Url;

use super::{FactoryRegistry, graph_nodes, is_reference, node_id, node_types, predicates};
use crate::vocab::jsonld::{ID, LIST, SET, VALUE};
use crate::config::LinksPolicy;
use crate::model::{Resource, ResourceHandle, TypesCollection, blank_node_iri};
use crate::{Error, Result};

/// Deferred callback fired once the resource of a given IRI materializes.
pub type Notification<C> = Box<dyn FnOnce(&ProcessingState<'_, C>, &ResourceHandle)>;

// ============================================================================
// Shared traversal state
// ============================================================================

struct TraversalState<C> {
    payload: Vec<JsonValue>,
    base_url: String,
    root_url: String,
    client: C,
    links_policy: LinksPolicy,
    factories: Arc<FactoryRegistry<C>>,
    resources: RefCell<HashMap<String, ResourceHandle>>,
    /// Every resource added as hypermedia, in discovery order.
    all_hypermedia: RefCell<Vec<ResourceHandle>>,
    /// IRIs present in `all_hypermedia`
    listed: RefCell<HashSet<String>>,
    owned: RefCell<HashSet<String>>,
    final_hypermedia: OnceCell<Vec<ResourceHandle>>,
    /// IRI → payload index; `None` records a miss
    found_resources: RefCell<HashMap<String, Option<usize>>>,
    notifications: RefCell<HashMap<String, Vec<Notification<C>>>>,
}

impl<C> TraversalState<C> {
    fn find_raw_resource(&self, iri: &str) -> Option<&JsonValue> {
        if iri.is_empty() {
            return None;
        }

        let cached = self.found_resources.borrow().get(iri).copied();
        let index = match cached {
            Some(index) => index,
            None => {
                let index = self.payload.iter().position(|node| node_id(node) == Some(iri));
                tracing::trace!(iri, found = index.is_some(), "raw resource lookup");
                self.found_resources.borrow_mut().insert(iri.to_string(), index);
                index
            }
        };
        index.map(|i| &self.payload[i])
    }

    /// First top-level node referencing `iri` from a non-keyword predicate.
    fn find_structural_parent(&self, iri: &str) -> Option<&str> {
        self.payload
            .iter()
            .find(|node| {
                predicates(node).any(|(_, values)| values.iter().any(|value| node_id(value) == Some(iri)))
            })
            .and_then(node_id)
    }

    fn push_hypermedia(&self, resource: &ResourceHandle) {
        if !self.listed.borrow_mut().insert(resource.iri().to_string()) {
            return;
        }
        if self.final_hypermedia.get().is_some() {
            tracing::warn!(iri = resource.iri(), "hypermedia already read; new resource not reflected");
        }
        self.all_hypermedia.borrow_mut().push(resource.clone());
    }
}

/// Give every anonymous node object below `value` a blank node `@id`.
///
/// Value objects are left alone; `@list`/`@set` containers are descended
/// into but not labeled themselves.
fn label_blank_nodes(value: &mut JsonValue) {
    match value {
        JsonValue::Array(items) => items.iter_mut().for_each(label_blank_nodes),
        JsonValue::Object(map) => {
            if map.contains_key(VALUE) {
                return;
            }
            let container = map.contains_key(LIST) || map.contains_key(SET);
            if !container && !map.contains_key(ID) {
                map.insert(ID.to_string(), JsonValue::String(blank_node_iri("b")));
            }
            for (key, nested) in map.iter_mut() {
                if container || !key.starts_with('@') {
                    label_blank_nodes(nested);
                }
            }
        }
        _ => {}
    }
}

enum Shared<'a, C> {
    Owned(Box<TraversalState<C>>),
    Borrowed(&'a TraversalState<C>),
}

#[derive(Clone, Copy)]
enum Processed<'a> {
    /// The whole payload (root context).
    Graph,
    Node(&'a JsonValue),
}

// ============================================================================
// ProcessingState
// ============================================================================

/// A JSON-LD processing context.
///
/// `C` is the opaque client handle passed through to factories.
pub struct ProcessingState<'a, C> {
    shared: Shared<'a, C>,
    processed: Processed<'a>,
    owner_iri: String,
    parent_iri: String,
    /// Identity minted for a processed node without `@id`.
    blank_iri: OnceCell<String>,
    current_resource: RefCell<Option<ResourceHandle>>,
}

impl<'a, C> ProcessingState<'a, C> {
    /// Create the root context for `payload`.
    ///
    /// `payload` may be a node array, an `@graph` document or a single node.
    /// Fails if `base_url` is not an absolute URL.
    pub fn new(payload: JsonValue, base_url: &str, client: C, links_policy: LinksPolicy) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|source| Error::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let root_url = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}://{host}:{port}/", url.scheme()),
            (Some(host), None) => format!("{}://{host}/", url.scheme()),
            (None, _) => format!("{}:", url.scheme()),
        };

        let mut payload = graph_nodes(payload);
        payload.iter_mut().for_each(label_blank_nodes);
        tracing::debug!(base_url, nodes = payload.len(), "created root processing state");

        let shared = TraversalState {
            payload,
            base_url: base_url.to_string(),
            root_url,
            client,
            links_policy,
            factories: Arc::new(FactoryRegistry::new()),
            resources: RefCell::default(),
            all_hypermedia: RefCell::default(),
            listed: RefCell::default(),
            owned: RefCell::default(),
            final_hypermedia: OnceCell::new(),
            found_resources: RefCell::default(),
            notifications: RefCell::default(),
        };

        Ok(Self {
            shared: Shared::Owned(Box::new(shared)),
            processed: Processed::Graph,
            owner_iri: base_url.to_string(),
            parent_iri: base_url.to_string(),
            blank_iri: OnceCell::new(),
            current_resource: RefCell::new(None),
        })
    }

    /// Use `factories` to build resources. Only meaningful on the root,
    /// before traversal starts; child contexts share their root's registry.
    pub fn with_factories(mut self, factories: Arc<FactoryRegistry<C>>) -> Self {
        if let Shared::Owned(shared) = &mut self.shared {
            shared.factories = factories;
        }
        self
    }

    fn child(
        shared: &'a TraversalState<C>,
        object: &'a JsonValue,
        owner_iri: String,
        parent_iri: String,
    ) -> Self {
        let object = match node_id(object) {
            Some(iri) if is_reference(object) => shared.find_raw_resource(iri).unwrap_or(object),
            _ => object,
        };

        Self {
            shared: Shared::Borrowed(shared),
            processed: Processed::Node(object),
            owner_iri,
            parent_iri,
            blank_iri: OnceCell::new(),
            current_resource: RefCell::new(None),
        }
    }

    fn shared(&self) -> &TraversalState<C> {
        match &self.shared {
            Shared::Owned(shared) => shared.as_ref(),
            Shared::Borrowed(shared) => *shared,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Node processed by this context; `None` for the root.
    pub fn processed_object(&self) -> Option<&'a JsonValue> {
        match self.processed {
            Processed::Graph => None,
            Processed::Node(node) => Some(node),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.processed, Processed::Graph)
    }

    /// IRI of the resource owning the processed object (not necessarily its parent).
    pub fn owner_iri(&self) -> &str {
        &self.owner_iri
    }

    pub fn parent_iri(&self) -> &str {
        &self.parent_iri
    }

    pub fn base_url(&self) -> &str {
        &self.shared().base_url
    }

    /// Scheme, host and port of the base URL, e.g. `https://api.example.com/`.
    pub fn root_url(&self) -> &str {
        &self.shared().root_url
    }

    pub fn client(&self) -> &C {
        &self.shared().client
    }

    pub fn links_policy(&self) -> LinksPolicy {
        self.shared().links_policy
    }

    pub fn factories(&self) -> &FactoryRegistry<C> {
        &self.shared().factories
    }

    /// Resource provided by this context, once [`provide_resource`](Self::provide_resource) ran.
    pub fn current_resource(&self) -> Option<ResourceHandle> {
        self.current_resource.borrow().clone()
    }

    /// Top-level nodes of the payload.
    pub fn nodes(&self) -> &[JsonValue] {
        &self.shared().payload
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Raw payload node with `@id` equal to `iri`. Results, misses included,
    /// are memoized for the traversal.
    pub fn find_raw_resource(&self, iri: &str) -> Option<&JsonValue> {
        self.shared().find_raw_resource(iri)
    }

    /// Already materialized resource for `iri`. Never materializes.
    pub fn get_visited_resource(&self, iri: &str) -> Option<ResourceHandle> {
        if iri.is_empty() {
            return None;
        }
        self.shared().resources.borrow().get(iri).cloned()
    }

    // ========================================================================
    // Hypermedia
    // ========================================================================

    /// Resources discovered as standalone hypermedia, in discovery order,
    /// without those marked owned.
    ///
    /// Computed on first call and memoized: mark resources owned before
    /// reading this.
    pub fn hypermedia(&self) -> &[ResourceHandle] {
        let shared = self.shared();
        shared.final_hypermedia.get_or_init(|| {
            let owned = shared.owned.borrow();
            shared
                .all_hypermedia
                .borrow()
                .iter()
                .filter(|resource| !owned.contains(resource.iri()))
                .cloned()
                .collect()
        })
    }

    /// Exclude `iri` from the hypermedia view, whether or not it was
    /// materialized yet.
    pub fn mark_as_owned(&self, iri: &str) {
        let shared = self.shared();
        if !shared.owned.borrow_mut().insert(iri.to_string()) {
            return;
        }
        if shared.final_hypermedia.get().is_some() {
            tracing::warn!(iri, "hypermedia already read; ownership not reflected");
        } else {
            tracing::trace!(iri, "marked as owned");
        }
    }

    pub fn is_owned(&self, iri: &str) -> bool {
        self.shared().owned.borrow().contains(iri)
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Derive a context for a nested `object`.
    ///
    /// The owner is this context's resource if it provided one, else this
    /// context's owner. The parent is this context's node, or, at the root,
    /// the top-level node referencing `object`.
    pub fn copy_for<'b>(&'b self, object: &'b JsonValue) -> ProcessingState<'b, C> {
        let owner_iri = match self.current_resource.borrow().as_ref() {
            Some(resource) => resource.iri().to_string(),
            None => self.owner_iri.clone(),
        };

        let parent_iri = match self.processed {
            Processed::Node(node) => node_id(node).map(str::to_string),
            Processed::Graph => node_id(object)
                .and_then(|iri| self.shared().find_structural_parent(iri))
                .map(str::to_string),
        }
        .unwrap_or_else(|| owner_iri.clone());

        ProcessingState::child(self.shared(), object, owner_iri, parent_iri)
    }

    /// Resource for the processed node, materializing it on first request.
    ///
    /// A new resource runs through every matching factory, is cached by IRI
    /// for the rest of the traversal, and fires pending notifications. With
    /// `add_to_hypermedia` unset the resource is marked owned instead of
    /// being listed.
    pub fn provide_resource(&self, add_to_hypermedia: bool) -> Result<ResourceHandle> {
        let Processed::Node(node) = self.processed else {
            return Err(Error::NotANode(self.owner_iri.clone()));
        };

        let shared = self.shared();
        let iri = match node_id(node) {
            Some(iri) => iri.to_string(),
            None => self.blank_iri.get_or_init(|| blank_node_iri("b")).clone(),
        };

        let existing = shared.resources.borrow().get(&iri).cloned();
        let (resource, created) = match existing {
            Some(resource) => (resource, false),
            None => self.create_resource(iri, node_types(node)),
        };

        if add_to_hypermedia {
            shared.push_hypermedia(&resource);
        } else {
            self.mark_as_owned(resource.iri());
        }

        *self.current_resource.borrow_mut() = Some(resource.clone());
        if created {
            self.on_materialized(&resource);
        }
        Ok(resource)
    }

    fn create_resource(&self, iri: String, types: TypesCollection) -> (ResourceHandle, bool) {
        let shared = self.shared();
        let mut resource = shared.factories.apply(Resource::new(iri.clone(), types), &shared.client, self);
        if resource.iri != iri {
            tracing::warn!(expected = %iri, got = %resource.iri, "factory changed resource identity; restored");
            resource.iri = iri.clone();
        }

        let mut resources = shared.resources.borrow_mut();
        if let Some(existing) = resources.get(&iri) {
            // A factory materialized this IRI while we were building it.
            return (existing.clone(), false);
        }
        let handle = ResourceHandle::new(resource);
        resources.insert(iri, handle.clone());
        tracing::debug!(iri = handle.iri(), owner = %self.owner_iri, "materialized resource");
        (handle, true)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Call `notification` once the resource for `iri` materializes.
    ///
    /// Callbacks for one IRI fire in registration order, exactly once. If
    /// the resource already exists the callback fires immediately.
    pub fn notify_materialized<F>(&self, iri: &str, notification: F)
    where
        F: FnOnce(&ProcessingState<'_, C>, &ResourceHandle) + 'static,
    {
        if let Some(resource) = self.get_visited_resource(iri) {
            notification(self, &resource);
            return;
        }
        self.shared()
            .notifications
            .borrow_mut()
            .entry(iri.to_string())
            .or_default()
            .push(Box::new(notification));
    }

    /// Number of callbacks still waiting for `iri`.
    pub fn pending_notifications(&self, iri: &str) -> usize {
        self.shared().notifications.borrow().get(iri).map_or(0, Vec::len)
    }

    fn on_materialized(&self, resource: &ResourceHandle) {
        let pending = self.shared().notifications.borrow_mut().remove(resource.iri());
        if let Some(pending) = pending {
            tracing::trace!(iri = resource.iri(), count = pending.len(), "dispatching notifications");
            for notification in pending {
                notification(self, resource);
            }
        }
    }
}

impl<C> std::fmt::Debug for ProcessingState<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingState")
            .field("root", &self.is_root())
            .field("owner_iri", &self.owner_iri)
            .field("parent_iri", &self.parent_iri)
            .field("base_url", &self.base_url())
            .field("current_resource", &self.current_resource.borrow())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
