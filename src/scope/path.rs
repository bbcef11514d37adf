//! Scope-to-path formatting

use super::id::ScopeId;
use crate::error::{Error, Result};

/// Turns a scope into the request path of the collection being listed
pub trait ScopePath: Send + Sync {
    /// Build the path (starting with `/`) for `scope`
    fn path(&self, scope: &ScopeId) -> Result<String>;
}

impl<F> ScopePath for F
where
    F: Fn(&ScopeId) -> String + Send + Sync,
{
    fn path(&self, scope: &ScopeId) -> Result<String> {
        Ok(self(scope))
    }
}

/// A provider collection below a scope
///
/// `ProviderCollection::new("Microsoft.EventGrid", "partnerRegistrations")`
/// lists `{scope}/providers/Microsoft.EventGrid/partnerRegistrations`. When
/// the scope already sits below the same namespace, only the collection is
/// appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCollection {
    namespace: String,
    collection: String,
}

impl ProviderCollection {
    /// Create a provider collection formatter
    pub fn new(namespace: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            collection: collection.into(),
        }
    }

    /// Parse `Namespace/collection`, as accepted on the command line
    pub fn from_spec(spec: &str) -> Result<Self> {
        match spec.trim_matches('/').split_once('/') {
            Some((namespace, collection)) if !namespace.is_empty() && !collection.is_empty() => {
                Ok(Self::new(namespace, collection))
            }
            _ => Err(Error::config(format!(
                "collection '{spec}' must look like 'Namespace/collection'"
            ))),
        }
    }
}

impl ScopePath for ProviderCollection {
    fn path(&self, scope: &ScopeId) -> Result<String> {
        if self.namespace.is_empty() || self.collection.is_empty() {
            return Err(Error::request(format!(
                "collection path for {scope} needs a namespace and a collection"
            )));
        }

        let same_namespace = scope
            .shape()
            .provider
            .is_some_and(|ns| ns.eq_ignore_ascii_case(&self.namespace));

        if same_namespace {
            Ok(format!("{}/{}", scope.id(), self.collection))
        } else {
            Ok(format!(
                "{}/providers/{}/{}",
                scope.id(),
                self.namespace,
                self.collection
            ))
        }
    }
}
