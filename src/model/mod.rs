//! # Hypermedia Resource Model
//!
//! DTOs for the materialized graph: resources, their type sets, the
//! filterable metadata collections hung off them, and templated operations.
//!
//! Design rule: this module is pure data. No traversal state, no I/O.

pub mod resource;
pub mod types;
pub mod collection;
pub mod operations;
pub mod links;
pub mod property_map;
pub mod templated_operation;

pub use resource::{Resource, ResourceHandle, blank_node_iri, is_blank_node};
pub use types::TypesCollection;
pub use collection::{CollectionItem, Facet, FilterableCollection, ResourceCollection};
pub use operations::OperationsCollection;
pub use links::LinksCollection;
pub use property_map::PropertyMap;
pub use templated_operation::TemplatedOperation;
