//! Hydra vocabulary terms the core relies on.
//!
//! Only the IRIs the graph engine itself needs live here; the full
//! vocabulary belongs to whatever factories a client registers.

/// Hydra core vocabulary (`http://www.w3.org/ns/hydra/core#`).
pub mod hydra {
    pub const NAMESPACE: &str = "http://www.w3.org/ns/hydra/core#";

    pub const API_DOCUMENTATION: &str = "http://www.w3.org/ns/hydra/core#ApiDocumentation";
    pub const CLASS: &str = "http://www.w3.org/ns/hydra/core#Class";
    pub const COLLECTION: &str = "http://www.w3.org/ns/hydra/core#Collection";
    pub const IRI_TEMPLATE: &str = "http://www.w3.org/ns/hydra/core#IriTemplate";
    pub const LINK: &str = "http://www.w3.org/ns/hydra/core#Link";
    pub const OPERATION: &str = "http://www.w3.org/ns/hydra/core#Operation";
    pub const TEMPLATED_LINK: &str = "http://www.w3.org/ns/hydra/core#TemplatedLink";

    pub const EXPECTS: &str = "http://www.w3.org/ns/hydra/core#expects";
    pub const METHOD: &str = "http://www.w3.org/ns/hydra/core#method";
    pub const OPERATION_PREDICATE: &str = "http://www.w3.org/ns/hydra/core#operation";
    pub const TEMPLATE: &str = "http://www.w3.org/ns/hydra/core#template";
}

/// JSON-LD keywords.
pub mod jsonld {
    pub const ID: &str = "@id";
    pub const TYPE: &str = "@type";
    pub const VALUE: &str = "@value";
    pub const GRAPH: &str = "@graph";
    pub const LIST: &str = "@list";
    pub const SET: &str = "@set";
}
