//! Cache key generation and entry tags

use std::fmt;

/// Generate a deterministic cache key from an operation name and its arguments.
///
/// The key is the operation name followed by the JSON encoding of the ordered
/// argument list, so argument values can never run into each other
/// (`["a:b"]` and `["a", "b"]` produce different keys).
pub fn cache_key(operation: &str, args: &[&str]) -> String {
    // Serializing a slice of strings cannot fail
    let encoded = serde_json::to_string(args).unwrap_or_default();
    format!("{}{}", operation, encoded)
}

/// Structured label attached to a cache entry.
///
/// Invalidation after mutations goes through tags rather than key substrings,
/// so a project ID that happens to be a substring of another ID never
/// invalidates the wrong entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Every entry produced by one API operation
    Operation(&'static str),
    /// Every entry scoped to one project
    Project(String),
}

impl CacheTag {
    pub fn project(id: &str) -> Self {
        CacheTag::Project(id.to_string())
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheTag::Operation(op) => write!(f, "op:{}", op),
            CacheTag::Project(id) => write!(f, "project:{}", id),
        }
    }
}
