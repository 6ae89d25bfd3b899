//! End-to-end integration tests for graph materialization.
//!
//! Tests deduplication, hypermedia ordering and exclusion of embedded
//! resources, forward and cyclic references, payload shapes, and the root
//! parameters handed to factories.
//!
//! Each test exercises: payload -> JsonLdProcessor -> ProcessingState -> hypermedia.

use hydra_graph::{
    Error, FactoryRegistry, JsonLdProcessor, LinksPolicy, ProcessorConfig, ResourceHandle,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value as JsonValue, json};

// ============================================================================
// Helpers
// ============================================================================

fn config() -> ProcessorConfig {
    ProcessorConfig::new("https://shop.example.com/api/entry")
}

fn process(payload: JsonValue) -> Vec<ResourceHandle> {
    JsonLdProcessor::<()>::default().process(payload, &config(), ()).unwrap()
}

fn iris(resources: &[ResourceHandle]) -> Vec<&str> {
    resources.iter().map(|r| r.iri()).collect()
}

// ============================================================================
// 1. Two references to the same @id resolve to one resource
// ============================================================================

#[test]
fn test_references_deduplicate() {
    let hypermedia = process(json!([
        {"@id": "urn:order:1", "x:customer": [{"@id": "urn:person:ada"}]},
        {"@id": "urn:order:2", "x:customer": [{"@id": "urn:person:ada"}]},
        {"@id": "urn:person:ada", "x:name": "Ada"}
    ]));

    assert_eq!(iris(&hypermedia), vec!["urn:order:1", "urn:order:2", "urn:person:ada"]);

    let first = hypermedia[0].read().related("x:customer")[0].clone();
    let second = hypermedia[1].read().related("x:customer")[0].clone();
    assert!(first.ptr_eq(&second));
    assert!(first.ptr_eq(&hypermedia[2]));
    assert_eq!(first.read().property("x:name"), &[json!("Ada")]);
}

// ============================================================================
// 2. Hypermedia keeps discovery order and drops embedded resources
// ============================================================================

#[test]
fn test_embedded_before_top_level_is_excluded() {
    let hypermedia = process(json!([
        {"@id": "urn:shop", "x:featured": [{"@id": "urn:p2", "@type": "x:Product", "x:name": "Lamp"}]},
        {"@id": "urn:p1", "@type": "x:Product"},
        {"@id": "urn:p2", "@type": "x:Product", "x:name": "Lamp"}
    ]));

    assert_eq!(iris(&hypermedia), vec!["urn:shop", "urn:p1"]);
    let featured = hypermedia[0].read().related("x:featured")[0].clone();
    assert_eq!(featured.iri(), "urn:p2");
    // Walked once, not once per occurrence.
    assert_eq!(featured.read().property("x:name").len(), 1);
}

#[test]
fn test_embedded_after_top_level_is_excluded() {
    let hypermedia = process(json!([
        {"@id": "urn:p2", "x:name": "Lamp"},
        {"@id": "urn:shop", "x:featured": [{"@id": "urn:p2", "x:name": "Lamp"}]}
    ]));

    assert_eq!(iris(&hypermedia), vec!["urn:shop"]);
}

#[test]
fn test_anonymous_nested_nodes_are_owned() {
    let hypermedia = process(json!({
        "@id": "urn:shop",
        "x:address": [{"@type": "x:PostalAddress", "x:city": "Lyon"}]
    }));

    assert_eq!(iris(&hypermedia), vec!["urn:shop"]);
    let address = hypermedia[0].read().related("x:address")[0].clone();
    assert!(hydra_graph::model::is_blank_node(address.iri()));
    assert!(address.is_of_type("x:PostalAddress"));
    assert_eq!(address.read().property("x:city"), &[json!("Lyon")]);
}

// ============================================================================
// 3. Forward and cyclic references
// ============================================================================

#[test]
fn test_forward_reference_resolves_once_materialized() {
    let hypermedia = process(json!([
        {"@id": "urn:a", "x:next": {"@id": "urn:b"}},
        {"@id": "urn:b", "x:next": {"@id": "urn:c"}},
        {"@id": "urn:c"}
    ]));

    let (a, b, c) = (&hypermedia[0], &hypermedia[1], &hypermedia[2]);
    assert!(a.read().related("x:next")[0].ptr_eq(b));
    assert!(b.read().related("x:next")[0].ptr_eq(c));
    assert!(c.read().related("x:next").is_empty());
}

#[test]
fn test_cycles_terminate() {
    let hypermedia = process(json!([
        {"@id": "urn:a", "x:child": [
            {"@id": "urn:b", "x:parent": {"@id": "urn:a"}, "x:self": {"@id": "urn:b"}}
        ]}
    ]));

    assert_eq!(iris(&hypermedia), vec!["urn:a"]);
    let a = &hypermedia[0];
    let b = a.read().related("x:child")[0].clone();
    assert!(b.read().related("x:parent")[0].ptr_eq(a));
    assert!(b.read().related("x:self")[0].ptr_eq(&b));
    assert_eq!(format!("{b:?}"), "ResourceHandle(\"urn:b\")");
}

// ============================================================================
// 4. Payload shapes
// ============================================================================

#[test]
fn test_graph_document() {
    let processor = JsonLdProcessor::<()>::default();
    let hypermedia = processor
        .process_str(
            r#"{
                "@context": {"x": "https://x.example/"},
                "@graph": [
                    {"@id": "urn:a", "@type": ["x:A", "x:B"]},
                    {"@id": "urn:b", "@type": "x:B"}
                ]
            }"#,
            &config(),
            (),
        )
        .unwrap();

    assert_eq!(iris(&hypermedia), vec!["urn:a", "urn:b"]);
    assert_eq!(hypermedia[0].read().types.iter().collect::<Vec<_>>(), vec!["x:A", "x:B"]);
}

#[test]
fn test_malformed_base_url_is_fatal() {
    let err = JsonLdProcessor::<()>::default()
        .process(json!([]), &ProcessorConfig::new("api/entry"), ())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBaseUrl { ref url, .. } if url == "api/entry"));
}

// ============================================================================
// 5. Root parameters reach every factory invocation
// ============================================================================

#[test]
fn test_factories_see_client_and_policy_at_depth() {
    let mut factories = FactoryRegistry::<String>::new();
    factories.register_when(
        "audit",
        |_| true,
        |mut resource, client, state| {
            resource.add_property("x:client", json!(client));
            resource.add_property("x:policy", json!(state.links_policy()));
            resource.base_url = Some(state.root_url().to_string());
            resource
        },
    );

    let config = config().with_links_policy(LinksPolicy::SameRoot);
    let hypermedia = JsonLdProcessor::new(factories)
        .process(
            json!([{"@id": "urn:a", "x:inner": [{"@id": "urn:b", "x:deeper": [{"@type": "x:Leaf"}]}]}]),
            &config,
            "tenant-7".to_string(),
        )
        .unwrap();

    let a = hypermedia[0].clone();
    let b = a.read().related("x:inner")[0].clone();
    let leaf = b.read().related("x:deeper")[0].clone();

    for resource in [&a, &b, &leaf] {
        let resource = resource.read();
        assert_eq!(resource.property("x:client"), &[json!("tenant-7")]);
        assert_eq!(resource.property("x:policy"), &[json!("same-root")]);
        assert_eq!(resource.base_url.as_deref(), Some("https://shop.example.com/"));
    }
}

// ============================================================================
// 6. Properties: references never duplicate hypermedia, whatever the graph
// ============================================================================

proptest! {
    #[test]
    fn prop_reference_graphs_keep_discovery_order(
        n in 1usize..10,
        edges in prop::collection::vec((0usize..10, 0usize..10), 0..30),
    ) {
        let nodes: Vec<JsonValue> = (0..n)
            .map(|i| {
                let refs: Vec<JsonValue> = edges
                    .iter()
                    .filter(|(from, _)| from % n == i)
                    .map(|(_, to)| json!({"@id": format!("urn:n{}", to % n)}))
                    .collect();
                json!({"@id": format!("urn:n{i}"), "x:ref": refs})
            })
            .collect();

        let hypermedia = process(JsonValue::Array(nodes));

        let expected: Vec<String> = (0..n).map(|i| format!("urn:n{i}")).collect();
        let actual: Vec<String> = hypermedia.iter().map(|r| r.iri().to_string()).collect();
        prop_assert_eq!(actual, expected);

        for resource in &hypermedia {
            let targets = resource.read().related("x:ref").to_vec();
            for target in &targets {
                prop_assert!(hypermedia.iter().any(|h| h.ptr_eq(target)));
            }
        }
    }
}
