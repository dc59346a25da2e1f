//! Memoization of resolved relations.
//!
//! Entries are keyed by resolution kind plus `(collection, field)` and stamped
//! with the [`SchemaRevision`] they were computed at. A lookup at a different
//! revision is a miss. When the cache exceeds `max_size`, the
//! least-recently-used entry is evicted.

use std::collections::HashMap;

use relshape_core::{SchemaChange, SchemaRevision};

use crate::m2a::RelationM2A;
use crate::m2m::RelationM2M;

/// Which resolver produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionKind {
    ManyToMany,
    ManyToAny,
}

/// A memoized result, including memoized absence.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    ManyToMany(Option<RelationM2M>),
    ManyToAny(Option<RelationM2A>),
}

impl Resolution {
    pub fn kind(&self) -> ResolutionKind {
        match self {
            Resolution::ManyToMany(_) => ResolutionKind::ManyToMany,
            Resolution::ManyToAny(_) => ResolutionKind::ManyToAny,
        }
    }

    pub fn is_resolved(&self) -> bool {
        match self {
            Resolution::ManyToMany(r) => r.is_some(),
            Resolution::ManyToAny(r) => r.is_some(),
        }
    }

    /// Collections besides the queried one that this result was derived from.
    fn dependencies(&self) -> Vec<String> {
        let mut deps = Vec::new();
        match self {
            Resolution::ManyToMany(Some(m2m)) => {
                deps.push(m2m.junction_collection_name().to_string());
                if let Some(related) = m2m.related_collection_name() {
                    deps.push(related.to_string());
                }
            }
            Resolution::ManyToAny(Some(m2a)) => {
                deps.push(m2a.junction_collection_name().to_string());
                deps.extend(m2a.allowed_collections.iter().cloned());
            }
            Resolution::ManyToMany(None) | Resolution::ManyToAny(None) => {}
        }
        deps
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: ResolutionKind,
    collection: String,
    field: String,
}

/// A cached resolution.
#[derive(Debug, Clone)]
pub struct CachedResolution {
    pub resolution: Resolution,
    /// Revision the resolution was computed at.
    pub revision: SchemaRevision,
    /// Collections the resolution depends on, including the queried one.
    pub dependencies: Vec<String>,
    /// Logical time of the last access.
    pub last_used: u64,
    /// Number of times this entry was served.
    pub hit_count: u64,
}

/// Counters reported by [`ResolutionCache::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// LRU cache of resolutions.
///
/// # Example
///
/// ```
/// use relshape_core::SchemaRevision;
/// use relshape_resolve::cache::{Resolution, ResolutionCache, ResolutionKind};
///
/// let mut cache = ResolutionCache::new(16);
/// let rev = SchemaRevision::default();
///
/// let first = cache.get_or_insert_with(ResolutionKind::ManyToMany, "articles", "title", rev, || {
///     Resolution::ManyToMany(None)
/// });
/// assert!(!first.is_resolved());
///
/// let called = std::cell::Cell::new(false);
/// cache.get_or_insert_with(ResolutionKind::ManyToMany, "articles", "title", rev, || {
///     called.set(true);
///     Resolution::ManyToMany(None)
/// });
/// assert!(!called.get());
/// ```
#[derive(Debug)]
pub struct ResolutionCache {
    entries: HashMap<CacheKey, CachedResolution>,
    max_size: usize,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl ResolutionCache {
    /// Create a cache holding at most `max_size` entries. 0 disables storage.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size.min(256)),
            max_size,
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached resolution for the key at `revision`, or build and insert it.
    ///
    /// The `builder` closure is only called on a miss.
    pub fn get_or_insert_with(
        &mut self,
        kind: ResolutionKind,
        collection: &str,
        field: &str,
        revision: SchemaRevision,
        builder: impl FnOnce() -> Resolution,
    ) -> Resolution {
        self.clock += 1;
        let key = CacheKey {
            kind,
            collection: collection.to_string(),
            field: field.to_string(),
        };

        if let Some(entry) = self.entries.get_mut(&key) {
            if entry.revision == revision {
                entry.last_used = self.clock;
                entry.hit_count += 1;
                self.hits += 1;
                tracing::trace!(collection = %collection, field = %field, kind = ?kind, "Resolution cache hit");
                return entry.resolution.clone();
            }
            tracing::trace!(collection = %collection, field = %field, "Resolution cache entry is stale");
        }

        self.misses += 1;
        tracing::trace!(collection = %collection, field = %field, kind = ?kind, "Resolution cache miss");
        let resolution = builder();
        if self.max_size == 0 {
            return resolution;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.evict_lru();
        }

        let mut dependencies = resolution.dependencies();
        dependencies.push(collection.to_string());
        dependencies.sort();
        dependencies.dedup();

        self.entries.insert(
            key,
            CachedResolution {
                resolution: resolution.clone(),
                revision,
                dependencies,
                last_used: self.clock,
                hit_count: 0,
            },
        );
        resolution
    }

    /// Check whether a key is cached, regardless of revision.
    pub fn contains(&self, kind: ResolutionKind, collection: &str, field: &str) -> bool {
        self.entries.contains_key(&CacheKey {
            kind,
            collection: collection.to_string(),
            field: field.to_string(),
        })
    }

    /// Drop every entry depending on a collection affected by `change`.
    /// Returns the number of evicted entries.
    pub fn evict_affected(&mut self, change: &SchemaChange) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.dependencies.iter().any(|c| change.touches(c)));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Evicted resolutions after schema change");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all cached resolutions. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    fn evict_lru(&mut self) {
        if let Some(lru_key) = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone())
        {
            self.entries.remove(&lru_key);
        }
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new(256)
    }
}
