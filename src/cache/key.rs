//! Cache Key Module
//!
//! Every stored key carries a namespace prefix so different kinds of cached
//! values can never collide.

use std::fmt;

// == Namespace ==
/// Kind of value a cache key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Composite country records
    Country,
}

impl Namespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Country => "country",
        }
    }
}

// == Cache Key ==
/// A namespaced cache key, rendered as `<namespace>:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(namespace: Namespace, id: &str) -> Self {
        Self(format!("{}:{}", namespace.prefix(), id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_prefixed() {
        let key = CacheKey::new(Namespace::Country, "france");
        assert_eq!(key.as_str(), "country:france");
        assert_eq!(key.to_string(), "country:france");
    }
}
