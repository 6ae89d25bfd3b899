//! # hydra-graph — Hydra Hypermedia Resource Graphs
//!
//! Materializes JSON-LD payloads into a deduplicated graph of hypermedia
//! resources, then lets clients query the operations, links and templated
//! operations hung off them.
//!
//! ## Design Principles
//!
//! 1. **One resource per IRI**: every traversal context shares a single
//!    dedupe map; equality of [`ResourceHandle`]s is identity
//! 2. **Factories decide meaning**: the engine only knows `{iri, types}`,
//!    a [`FactoryRegistry`] turns that into operations, links, targets
//! 3. **Filters are values**: collection filters return new collections of
//!    the same type, so they chain
//! 4. **Templates are pluggable**: [`TemplatedOperation`] expands through
//!    any [`TemplateExpander`]; [`UriTemplate`] is the built-in one
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hydra_graph::{FactoryRegistry, JsonLdProcessor, ProcessorConfig};
//! use serde_json::json;
//!
//! # fn example() -> hydra_graph::Result<()> {
//! let mut factories = FactoryRegistry::<()>::new();
//! factories.register("http://schema.org/Order", |mut resource, _client, state| {
//!     resource.base_url = Some(state.base_url().to_string());
//!     resource
//! });
//!
//! let processor = JsonLdProcessor::new(factories);
//! let hypermedia = processor.process(
//!     json!([{"@id": "https://api.example.com/orders/1", "@type": "http://schema.org/Order"}]),
//!     &ProcessorConfig::new("https://api.example.com/orders"),
//!     (),
//! )?;
//!
//! for resource in &hypermedia {
//!     println!("{resource} {:?}", resource.read().types);
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod jsonld;
pub mod model;
pub mod template;
pub mod vocab;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    CollectionItem, Facet, FilterableCollection, LinksCollection, OperationsCollection,
    PropertyMap, Resource, ResourceCollection, ResourceHandle, TemplatedOperation,
    TypesCollection,
};

// ============================================================================
// Re-exports: Processing
// ============================================================================

pub use config::{LinksPolicy, ProcessorConfig};
pub use jsonld::{Factory, FactoryRegistry, JsonLdProcessor, Notification, ProcessingState};

// ============================================================================
// Re-exports: Templates
// ============================================================================

pub use template::{TemplateExpander, TemplateVariables, UriTemplate};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cannot resolve target {target:?} against {base:?}: {source}")]
    InvalidTarget {
        target: String,
        base: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Invalid URI template {template:?}: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: iri_string::template::Error,
    },

    #[error("Not a node context: {0}")]
    NotANode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
