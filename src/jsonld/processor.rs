//! Depth-first traversal driving [`ProcessingState`] over a payload.
//!
//! ```text
//! payload ──▶ root state ──▶ for each top-level node:
//!                              copy_for(node) ──▶ visit(add_to_hypermedia = true)
//!                                                   │
//!     literal / @value ──────▶ properties           │
//!     {"@id"} reference ─────▶ related (now, or on materialization)
//!     nested node object ────▶ copy_for ──▶ visit(add_to_hypermedia = false)
//! ```
//!
//! What a predicate *means* (operation, link, plain data) is left to the
//! registered factories; the driver only wires the graph together.

use std::sync::Arc;

use hashbrown::HashSet;
use serde_json::Value as JsonValue;

use super::{FactoryRegistry, ProcessingState, is_reference, is_value_object, literal, node_id, predicates};
use crate::config::ProcessorConfig;
use crate::model::ResourceHandle;
use crate::Result;

/// Materializes JSON-LD payloads into hypermedia resources.
pub struct JsonLdProcessor<C> {
    factories: Arc<FactoryRegistry<C>>,
}

impl<C> JsonLdProcessor<C> {
    pub fn new(factories: FactoryRegistry<C>) -> Self {
        Self { factories: Arc::new(factories) }
    }

    pub fn factories(&self) -> &FactoryRegistry<C> {
        &self.factories
    }

    /// Materialize `payload` and return its hypermedia, in discovery order.
    pub fn process(&self, payload: JsonValue, config: &ProcessorConfig, client: C) -> Result<Vec<ResourceHandle>> {
        let root = ProcessingState::new(payload, &config.base_url, client, config.links_policy)?
            .with_factories(Arc::clone(&self.factories));

        let mut walked = HashSet::new();
        for node in root.nodes() {
            visit(&root.copy_for(node), true, &mut walked)?;
        }

        let hypermedia = root.hypermedia().to_vec();
        tracing::debug!(base_url = %config.base_url, resources = hypermedia.len(), "processed payload");
        Ok(hypermedia)
    }

    /// [`process`](Self::process) a JSON text.
    pub fn process_str(&self, payload: &str, config: &ProcessorConfig, client: C) -> Result<Vec<ResourceHandle>> {
        let payload: JsonValue = serde_json::from_str(payload)?;
        self.process(payload, config, client)
    }
}

impl<C> Default for JsonLdProcessor<C> {
    fn default() -> Self {
        Self::new(FactoryRegistry::new())
    }
}

impl<C> std::fmt::Debug for JsonLdProcessor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLdProcessor").field("factories", &self.factories).finish()
    }
}

/// Provide the resource of `state`'s node and wire up its predicates.
///
/// A resource's predicates are walked once, even when factories already
/// materialized it or it appears both at the top level and embedded.
fn visit<C>(state: &ProcessingState<'_, C>, add_to_hypermedia: bool, walked: &mut HashSet<String>) -> Result<ResourceHandle> {
    let resource = state.provide_resource(add_to_hypermedia)?;
    let Some(node) = state.processed_object() else {
        return Ok(resource);
    };
    if !walked.insert(resource.iri().to_string()) {
        return Ok(resource);
    }

    for (predicate, values) in predicates(node) {
        for value in values {
            if !value.is_object() || is_value_object(value) {
                resource.write().add_property(predicate, literal(value));
            } else if is_reference(value) {
                attach_reference(state, &resource, predicate, value)?;
            } else {
                // Embedding makes it owned, even if it was materialized elsewhere first.
                let related = visit(&state.copy_for(value), false, walked)?;
                resource.write().attach(predicate, related);
            }
        }
    }

    Ok(resource)
}

fn attach_reference<C>(
    state: &ProcessingState<'_, C>,
    resource: &ResourceHandle,
    predicate: &str,
    reference: &JsonValue,
) -> Result<()> {
    let Some(iri) = node_id(reference) else {
        return Ok(());
    };

    if let Some(target) = state.get_visited_resource(iri) {
        resource.write().attach(predicate, target);
    } else if state.find_raw_resource(iri).is_some() {
        // Materialized later as a top-level node; wire it up then.
        let source = resource.clone();
        let predicate = predicate.to_string();
        state.notify_materialized(iri, move |_, target| {
            source.write().attach(predicate, target.clone());
        });
    } else {
        // Not described in this payload: a bare resource known only by IRI.
        let target = state.copy_for(reference).provide_resource(false)?;
        resource.write().attach(predicate, target);
    }
    Ok(())
}
