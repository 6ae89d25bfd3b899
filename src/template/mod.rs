//! URI template expansion.
//!
//! Templated operations only need "substitute these variables into this
//! template". That contract is [`TemplateExpander`]; [`UriTemplate`] is the
//! default, backed by the RFC 6570 engine of `iri-string`.

use std::collections::{BTreeMap, HashMap};

use iri_string::spec::UriSpec;
use iri_string::template::UriTemplateStr;
use iri_string::template::context::{Context, Visitor};

use crate::{Error, Result};

/// Variable lookup for template expansion.
pub trait TemplateVariables {
    fn get(&self, name: &str) -> Option<&str>;
}

impl TemplateVariables for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }
}

impl TemplateVariables for hashbrown::HashMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        hashbrown::HashMap::get(self, name).map(String::as_str)
    }
}

impl TemplateVariables for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        BTreeMap::get(self, name).map(String::as_str)
    }
}

impl TemplateVariables for [(&str, &str)] {
    fn get(&self, name: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }
}

impl<const N: usize> TemplateVariables for [(&str, &str); N] {
    fn get(&self, name: &str) -> Option<&str> {
        TemplateVariables::get(self.as_slice(), name)
    }
}

/// Substitutes variables into an IRI template.
///
/// Implementations own percent-encoding and the omission of unset variables.
pub trait TemplateExpander {
    fn expand(&self, template: &str, variables: &dyn TemplateVariables) -> Result<String>;
}

/// RFC 6570 expander for string variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriTemplate;

impl TemplateExpander for UriTemplate {
    fn expand(&self, template: &str, variables: &dyn TemplateVariables) -> Result<String> {
        let invalid = |source| Error::InvalidTemplate {
            template: template.to_string(),
            source,
        };
        let parsed = UriTemplateStr::new(template).map_err(invalid)?;
        let context = VariablesContext(variables);
        let expanded = parsed.expand::<UriSpec, _>(&context).map_err(invalid)?;
        Ok(expanded.to_string())
    }
}

/// Exposes [`TemplateVariables`] to the `iri-string` engine. Every variable
/// is a string; missing ones are undefined.
struct VariablesContext<'a>(&'a dyn TemplateVariables);

impl Context for VariablesContext<'_> {
    fn visit<V: Visitor>(&self, visitor: V) -> V::Result {
        match self.0.get(visitor.var_name().as_str()) {
            Some(value) => visitor.visit_string(value),
            None => visitor.visit_undefined(),
        }
    }
}
