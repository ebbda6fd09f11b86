//! Route classification.
//!
//! Categorizes a request path as protected, public, both, or neither. The
//! protected/public overlap is not resolved here; the auth gate decides.

use serde::Serialize;

use crate::config::RouteTableConfig;
use crate::routing::matcher::PrefixSet;

/// The three prefix tables consulted by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    pub protected: PrefixSet,
    pub public: PrefixSet,
    pub edition_only: PrefixSet,
}

impl RouteTable {
    pub fn from_config(config: &RouteTableConfig) -> Self {
        Self {
            protected: PrefixSet::new(config.protected.iter().cloned()),
            public: PrefixSet::new(config.public.iter().cloned()),
            edition_only: PrefixSet::new(config.edition_only.iter().cloned()),
        }
    }
}

/// Result of classifying a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Classification {
    pub is_protected: bool,
    pub is_public: bool,
}

impl Classification {
    /// Protected and not overridden by a public prefix.
    pub fn requires_session(&self) -> bool {
        self.is_protected && !self.is_public
    }
}

/// Classify `path` against the protected and public tables.
pub fn classify(path: &str, table: &RouteTable) -> Classification {
    Classification {
        is_protected: table.protected.matches(path),
        is_public: table.public.matches(path),
    }
}
