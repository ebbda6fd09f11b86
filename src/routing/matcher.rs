//! Path prefix matching.
//!
//! # Responsibilities
//! - Hold an ordered list of path prefixes
//! - Answer "does this path start with any of them"
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Empty path never matches, even against an empty prefix
//! - No regex to guarantee O(n) matching
//! - Linear scan; route tables are a handful of entries

/// An ordered, immutable set of path prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSet {
    prefixes: Vec<String>,
}

impl PrefixSet {
    /// Build a set from prefixes, keeping their order.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `path` starts with any prefix in the set.
    pub fn matches(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }

    /// Returns the first prefix (in configured order) that `path` starts with.
    pub fn first_match(&self, path: &str) -> Option<&str> {
        if path.is_empty() {
            return None;
        }
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| path.starts_with(prefix))
    }
}
