//! Namespaced resource references

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a namespaced resource such as an upstream or an upstream group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

impl ResourceRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { name: name.into(), namespace: namespace.into() }
    }

    /// Reference with an empty namespace
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), namespace: String::new() }
    }

    /// Envoy cluster name generated for this upstream: `name_namespace`, or just
    /// `name` when the namespace is empty
    pub fn cluster_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}_{}", self.name, self.namespace)
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace, self.name)
        }
    }
}
