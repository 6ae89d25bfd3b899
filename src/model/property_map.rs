//! PropertyMap — literal data recorded on a resource, keyed by predicate IRI.

use hashbrown::HashMap;
use serde_json::Value as JsonValue;

/// Map of predicate IRIs to the literal values found for them, in document order.
pub type PropertyMap = HashMap<String, Vec<JsonValue>>;
