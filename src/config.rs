//! Processing configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Which predicates count as navigable links.
///
/// Opaque to the graph engine: it is handed, untouched, to factories and
/// traversal logic through every processing context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinksPolicy {
    /// Only predicates explicitly typed `hydra:Link`.
    #[default]
    Strict,
    /// Also resources sharing the root URL of the response.
    SameRoot,
    /// Also any HTTP(S) resource.
    AllHttp,
    /// Any resource reference.
    All,
}

/// Configuration for one processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Absolute URL the payload was retrieved from.
    pub base_url: String,
    #[serde(default)]
    pub links_policy: LinksPolicy,
}

impl ProcessorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), links_policy: LinksPolicy::default() }
    }

    pub fn with_links_policy(mut self, links_policy: LinksPolicy) -> Self {
        self.links_policy = links_policy;
        self
    }

    /// Parse a configuration document, e.g.
    /// `{"base_url": "https://api.example.com/", "links_policy": "same-root"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let config = ProcessorConfig::from_json(
            r#"{"base_url": "https://api.example.com/", "links_policy": "all-http"}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/");
        assert_eq!(config.links_policy, LinksPolicy::AllHttp);
    }

    #[test]
    fn test_policy_defaults_to_strict() {
        let config = ProcessorConfig::from_json(r#"{"base_url": "https://a/"}"#).unwrap();
        assert_eq!(config.links_policy, LinksPolicy::Strict);
        assert_eq!(ProcessorConfig::new("https://a/"), config);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(ProcessorConfig::from_json("{"), Err(crate::Error::Json(_))));
    }
}
