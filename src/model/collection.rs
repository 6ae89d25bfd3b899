//! Filterable collections of resource metadata.
//!
//! Every filter is non-mutating and returns a fresh collection of the same
//! concrete type through [`FilterableCollection::create_instance`], so chains
//! like `operations.expecting(..).with_template()` stay operations
//! collections all the way down. Filters never reorder.

use super::{Resource, ResourceHandle};

/// Nested collection property of a resource, as addressed by
/// [`FilterableCollection::narrow_filters_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    /// Classes an operation expects.
    Expects,
    /// Links of a resource.
    Links,
    /// Operations of a resource (or sub-operations of an operation).
    Operations,
}

/// An item that can sit in a filterable collection.
pub trait CollectionItem: Clone {
    fn iri(&self) -> &str;

    fn is_of_type(&self, type_iri: &str) -> bool;

    /// Whether the nested collection `facet` holds an element matching `predicate`.
    fn any_nested(&self, facet: Facet, predicate: &dyn Fn(&ResourceHandle) -> bool) -> bool;
}

impl CollectionItem for ResourceHandle {
    fn iri(&self) -> &str {
        ResourceHandle::iri(self)
    }

    fn is_of_type(&self, type_iri: &str) -> bool {
        ResourceHandle::is_of_type(self, type_iri)
    }

    fn any_nested(&self, facet: Facet, predicate: &dyn Fn(&ResourceHandle) -> bool) -> bool {
        // Clone the nested handles out so the predicate may lock other
        // resources (including this one) without holding our guard.
        let nested = self.read().facet(facet).to_vec();
        nested.iter().any(predicate)
    }
}

impl CollectionItem for Resource {
    fn iri(&self) -> &str {
        &self.iri
    }

    fn is_of_type(&self, type_iri: &str) -> bool {
        Resource::is_of_type(self, type_iri)
    }

    fn any_nested(&self, facet: Facet, predicate: &dyn Fn(&ResourceHandle) -> bool) -> bool {
        self.facet(facet).iter().any(predicate)
    }
}

/// Order-preserving, predicate-composable container.
pub trait FilterableCollection: Sized {
    type Item: CollectionItem;

    fn items(&self) -> &[Self::Item];

    /// Build a collection of this concrete type from filtered items.
    fn create_instance(items: Vec<Self::Item>) -> Self;

    /// Items satisfying `predicate`, in original order.
    fn filter_by<P>(&self, predicate: P) -> Self
    where
        P: Fn(&Self::Item) -> bool,
    {
        Self::create_instance(self.items().iter().filter(|item| predicate(item)).cloned().collect())
    }

    /// Items whose type set contains `type_iri`.
    fn of_type(&self, type_iri: &str) -> Self {
        self.filter_by(|item| item.is_of_type(type_iri))
    }

    /// Items whose nested `facet` collection holds at least one element
    /// satisfying `predicate`.
    fn narrow_filters_with<P>(&self, facet: Facet, predicate: P) -> Self
    where
        P: Fn(&ResourceHandle) -> bool,
    {
        self.filter_by(|item| item.any_nested(facet, &predicate))
    }

    fn first(&self) -> Option<&Self::Item> {
        self.items().first()
    }
}

/// Defines a concrete resource collection: the struct, its `EMPTY`
/// constant, accessors, iteration, and the [`FilterableCollection`] impl.
macro_rules! filterable_collection {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            items: Vec<$crate::model::ResourceHandle>,
        }

        impl $name {
            /// Shared empty collection; never allocates.
            pub const EMPTY: $name = $name { items: Vec::new() };

            pub fn new<I>(items: I) -> Self
            where
                I: IntoIterator<Item = $crate::model::ResourceHandle>,
            {
                Self { items: items.into_iter().collect() }
            }

            pub fn push(&mut self, item: $crate::model::ResourceHandle) {
                self.items.push(item);
            }

            pub fn as_slice(&self) -> &[$crate::model::ResourceHandle] {
                &self.items
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $crate::model::ResourceHandle> {
                self.items.iter()
            }

            pub fn len(&self) -> usize {
                self.items.len()
            }

            pub fn is_empty(&self) -> bool {
                self.items.is_empty()
            }

            /// IRIs of the items, in order.
            pub fn iris(&self) -> Vec<&str> {
                self.items.iter().map(|item| item.iri()).collect()
            }
        }

        impl $crate::model::FilterableCollection for $name {
            type Item = $crate::model::ResourceHandle;

            fn items(&self) -> &[$crate::model::ResourceHandle] {
                &self.items
            }

            fn create_instance(items: Vec<$crate::model::ResourceHandle>) -> Self {
                Self { items }
            }
        }

        impl FromIterator<$crate::model::ResourceHandle> for $name {
            fn from_iter<I: IntoIterator<Item = $crate::model::ResourceHandle>>(iter: I) -> Self {
                Self::new(iter)
            }
        }

        impl IntoIterator for $name {
            type Item = $crate::model::ResourceHandle;
            type IntoIter = std::vec::IntoIter<$crate::model::ResourceHandle>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $crate::model::ResourceHandle;
            type IntoIter = std::slice::Iter<'a, $crate::model::ResourceHandle>;

            fn into_iter(self) -> Self::IntoIter {
                self.items.iter()
            }
        }
    };
}

pub(crate) use filterable_collection;

filterable_collection! {
    /// Generic resource collection (classes, members, related resources).
    ResourceCollection
}

impl ResourceCollection {
    /// Items with the given IRI (at most one per traversal, given dedupe).
    pub fn with_iri(&self, iri: &str) -> Self {
        self.filter_by(|item| item.iri() == iri)
    }
}
