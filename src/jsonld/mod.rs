//! # JSON-LD Graph Materialization
//!
//! Turns a flattened (or nested) JSON-LD node array into deduplicated
//! [`ResourceHandle`](crate::model::ResourceHandle)s.
//!
//! ```text
//! payload ──▶ ProcessingState (root) ──copy_for()──▶ ProcessingState (child) ...
//!                  │                                       │
//!                  └──── shared: dedupe map, hypermedia, ──┘
//!                        owned set, notifications, raw index
//! ```
//!
//! The helpers below read node shapes; they never validate JSON-LD.

pub mod factory;
pub mod processor;
pub mod state;

pub use factory::{Factory, FactoryRegistry};
pub use processor::JsonLdProcessor;
pub use state::{Notification, ProcessingState};

use serde_json::Value as JsonValue;

use crate::model::TypesCollection;
use crate::vocab::jsonld::{GRAPH, ID, TYPE, VALUE};

/// `@id` of a node object.
pub fn node_id(node: &JsonValue) -> Option<&str> {
    node.get(ID).and_then(JsonValue::as_str)
}

/// `@type` of a node object; accepts a single IRI or an array.
pub fn node_types(node: &JsonValue) -> TypesCollection {
    values_of(node.get(TYPE).unwrap_or(&JsonValue::Null))
        .iter()
        .filter_map(JsonValue::as_str)
        .collect()
}

/// A bare reference: an object whose only key is `@id`.
pub fn is_reference(node: &JsonValue) -> bool {
    node.as_object().is_some_and(|map| map.len() == 1 && map.contains_key(ID))
}

/// A value object (`{"@value": ...}`).
pub fn is_value_object(node: &JsonValue) -> bool {
    node.as_object().is_some_and(|map| map.contains_key(VALUE))
}

/// Literal carried by a value: the `@value` of a value object, else the value itself.
pub fn literal(value: &JsonValue) -> JsonValue {
    value.get(VALUE).cloned().unwrap_or_else(|| value.clone())
}

/// View a predicate value as a list. `null` is empty, scalars are singletons.
pub fn values_of(value: &JsonValue) -> &[JsonValue] {
    match value {
        JsonValue::Array(values) => values,
        JsonValue::Null => &[],
        other => std::slice::from_ref(other),
    }
}

/// Non-keyword predicates of a node with their values.
pub fn predicates(node: &JsonValue) -> impl Iterator<Item = (&str, &[JsonValue])> {
    node.as_object()
        .into_iter()
        .flat_map(|map| map.iter())
        .filter(|(key, _)| !key.starts_with('@'))
        .map(|(key, value)| (key.as_str(), values_of(value)))
}

/// Top-level nodes of a payload: a node array, an `@graph` document, or a
/// single node object.
pub fn graph_nodes(payload: JsonValue) -> Vec<JsonValue> {
    match payload {
        JsonValue::Array(nodes) => nodes,
        JsonValue::Object(mut map) => match map.remove(GRAPH) {
            Some(JsonValue::Array(nodes)) => nodes,
            Some(graph) => {
                map.insert(GRAPH.to_string(), graph);
                vec![JsonValue::Object(map)]
            }
            None => vec![JsonValue::Object(map)],
        },
        _ => Vec::new(),
    }
}
