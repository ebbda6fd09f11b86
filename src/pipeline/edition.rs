//! Edition rewriting.
//!
//! With the paid enterprise edition deployed, a short list of routes is served
//! from a separate namespace (`/admin/groups` → `/ee/admin/groups`). The
//! rewrite is internal; the client keeps seeing the original URL.

use crate::config::{EditionConfig, RouteTableConfig};
use crate::routing::PrefixSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditionDecision {
    Rewrite { path: String },
    NoRewrite,
}

#[derive(Debug, Clone)]
pub struct EditionRewriter {
    enabled: bool,
    namespace: String,
    prefixes: PrefixSet,
}

impl EditionRewriter {
    pub fn new(enabled: bool, namespace: impl Into<String>, prefixes: PrefixSet) -> Self {
        Self {
            enabled,
            namespace: namespace.into(),
            prefixes,
        }
    }

    pub fn from_config(edition: &EditionConfig, routes: &RouteTableConfig) -> Self {
        Self::new(
            edition.paid_enterprise_features_enabled,
            edition.namespace.clone(),
            PrefixSet::new(routes.edition_only.iter().cloned()),
        )
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Nest `path` under the namespace when the flag is on and an edition
    /// prefix matches. Query and fragment are not part of `path` and stay
    /// with the caller.
    pub fn rewrite_for_edition(&self, path: &str) -> EditionDecision {
        if !self.enabled || !self.prefixes.matches(path) {
            return EditionDecision::NoRewrite;
        }
        EditionDecision::Rewrite {
            path: format!("{}{}", self.namespace, path),
        }
    }
}
