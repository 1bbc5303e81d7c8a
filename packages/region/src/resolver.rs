//! Memoizing wrapper around [`resolve_region`](crate::resolve_region).
//!
//! The same noisy labels repeat across millions of rows, so resolution
//! is cached per distinct raw input. The cache grows unbounded within a
//! load cycle and is dropped with the resolver.

use std::collections::BTreeMap;

use crate::Region;

/// Caching region resolver for bulk cleaning passes.
#[derive(Debug, Default)]
pub struct RegionResolver {
    cache: BTreeMap<String, Option<Region>>,
}

impl RegionResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a raw label, consulting the cache first.
    pub fn resolve(&mut self, input: &str) -> Option<Region> {
        if let Some(cached) = self.cache.get(input) {
            return *cached;
        }

        let resolved = crate::resolve_region(input);
        self.cache.insert(input.to_string(), resolved);
        resolved
    }

    /// Number of distinct raw labels seen so far.
    #[must_use]
    pub fn distinct_labels(&self) -> usize {
        self.cache.len()
    }
}
