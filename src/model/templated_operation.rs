//! Operation whose target is an IRI template.
//!
//! ```text
//! operation + IriTemplate ──new()──▶ TemplatedOperation (target: none)
//!                                      │
//!                  variables ──expand_target()──▶ Resource (target: resolved IRI)
//! ```

use url::Url;

use super::{
    LinksCollection, OperationsCollection, Resource, ResourceCollection, TypesCollection,
    blank_node_iri,
};
use crate::template::{TemplateExpander, TemplateVariables, UriTemplate};
use crate::vocab::hydra;
use crate::{Error, Result};

/// Operation bound to an IRI template instead of a concrete target.
#[derive(Debug, Clone)]
pub struct TemplatedOperation {
    iri: String,
    types: TypesCollection,
    base_url: Option<String>,
    method: Option<String>,
    expects: ResourceCollection,
    links: LinksCollection,
    operations: OperationsCollection,
    template: String,
}

impl TemplatedOperation {
    /// Wrap `operation` with `template`.
    ///
    /// Types become the operation's types plus `hydra:Operation` and
    /// `hydra:IriTemplate`. The identity is a fresh blank node.
    ///
    /// Sub-operations of `operation` are carried over, so they survive
    /// expansion. A templated operation recovered with
    /// [`from_resource`](Self::from_resource) keeps whatever its resource
    /// form holds, which is empty unless a factory filled it.
    pub fn new(operation: &Resource, template: impl Into<String>) -> Self {
        Self {
            iri: blank_node_iri("bnode"),
            types: operation.types.with([hydra::OPERATION, hydra::IRI_TEMPLATE]),
            base_url: operation.base_url.clone(),
            method: operation.method.clone(),
            expects: operation.expects.clone(),
            links: operation.links.clone(),
            operations: operation.operations.clone(),
            template: template.into(),
        }
    }

    /// Recover a templated operation from its resource form, if it is one.
    pub fn from_resource(resource: &Resource) -> Option<Self> {
        if !resource.is_of_type(hydra::IRI_TEMPLATE) {
            return None;
        }
        let template = resource.template.clone()?;
        Some(Self {
            iri: resource.iri.clone(),
            types: resource.types.clone(),
            base_url: resource.base_url.clone(),
            method: resource.method.clone(),
            expects: resource.expects.clone(),
            links: resource.links.clone(),
            operations: resource.operations.clone(),
            template,
        })
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn types(&self) -> &TypesCollection {
        &self.types
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn expects(&self) -> &ResourceCollection {
        &self.expects
    }

    pub fn links(&self) -> &LinksCollection {
        &self.links
    }

    pub fn operations(&self) -> &OperationsCollection {
        &self.operations
    }

    /// Resource form, suitable for an operations collection. Its target is unset.
    pub fn to_resource(&self) -> Resource {
        Resource {
            iri: self.iri.clone(),
            types: self.types.clone(),
            base_url: self.base_url.clone(),
            method: self.method.clone(),
            expects: self.expects.clone(),
            links: self.links.clone(),
            operations: self.operations.clone(),
            target: None,
            template: Some(self.template.clone()),
            ..Resource::default()
        }
    }

    /// Expand the template with `variables` using the built-in RFC 6570 expander.
    pub fn expand_target<V>(&self, variables: &V) -> Result<Resource>
    where
        V: TemplateVariables + ?Sized,
    {
        self.expand_target_with(&UriTemplate, variables)
    }

    /// Expand the template with `variables` into a concrete operation.
    ///
    /// Every call mints a new identity, even for identical input.
    pub fn expand_target_with<V>(&self, expander: &dyn TemplateExpander, variables: &V) -> Result<Resource>
    where
        V: TemplateVariables + ?Sized,
    {
        let expanded = expander.expand(&self.template, &VariablesRef(variables))?;
        let target = if has_scheme(&expanded) {
            expanded
        } else {
            self.resolve(&expanded)?
        };

        tracing::trace!(template = %self.template, %target, "expanded templated operation");

        Ok(Resource {
            iri: blank_node_iri("operation"),
            types: self.types.without(hydra::IRI_TEMPLATE),
            base_url: self.base_url.clone(),
            method: self.method.clone(),
            expects: self.expects.clone(),
            links: self.links.clone(),
            operations: self.operations.clone(),
            target: Some(Resource::new(target, TypesCollection::EMPTY).into_handle()),
            ..Resource::default()
        })
    }

    fn resolve(&self, relative: &str) -> Result<String> {
        let base = self.base_url.as_deref().unwrap_or_default();
        let invalid = |source| Error::InvalidTarget {
            target: relative.to_string(),
            base: base.to_string(),
            source,
        };
        let base_url = Url::parse(base).map_err(invalid)?;
        let resolved = base_url.join(relative).map_err(invalid)?;
        Ok(resolved.to_string())
    }
}

impl From<TemplatedOperation> for Resource {
    fn from(operation: TemplatedOperation) -> Self {
        operation.to_resource()
    }
}

/// Adapts a possibly-unsized variables source to `&dyn TemplateVariables`.
struct VariablesRef<'a, V: ?Sized>(&'a V);

impl<V: TemplateVariables + ?Sized> TemplateVariables for VariablesRef<'_, V> {
    fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name)
    }
}

/// Whether `iri` starts with a scheme: a letter, then letters, digits or `_`, then `:`.
fn has_scheme(iri: &str) -> bool {
    let Some((scheme, _)) = iri.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
