//! Memoizing resolver over a schema source.

use relshape_core::{SchemaChange, SchemaSource};

use crate::cache::{CacheStats, Resolution, ResolutionCache, ResolutionKind};
use crate::config::ResolverConfig;
use crate::m2a::{RelationM2A, resolve_m2a_with};
use crate::m2m::{RelationM2M, resolve_m2m_with};

/// Resolves M2M and M2A fields against a [`SchemaSource`], memoizing results
/// until the source's revision changes.
///
/// # Example
///
/// ```
/// use relshape_core::{Relation, RelationMeta, SchemaStore};
/// use relshape_resolve::RelationResolver;
///
/// let mut store = SchemaStore::new();
/// store.replace_relations(vec![
///     Relation::new("articles_tags", "tag_id").related_collection("tags"),
///     Relation::new("articles_tags", "article_id")
///         .related_collection("articles")
///         .meta(RelationMeta::new().one_field("tags").junction_field("tag_id")),
/// ]).unwrap();
///
/// let mut resolver = RelationResolver::new(&store);
/// let m2m = resolver.resolve_m2m("articles", "tags").unwrap();
/// assert_eq!(m2m.related_collection_name(), Some("tags"));
/// ```
#[derive(Debug)]
pub struct RelationResolver<S> {
    source: S,
    config: ResolverConfig,
    cache: ResolutionCache,
}

impl<S: SchemaSource> RelationResolver<S> {
    /// Create a resolver with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    pub fn with_config(source: S, config: ResolverConfig) -> Self {
        Self {
            cache: ResolutionCache::new(config.cache_capacity),
            source,
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source. Mutations bump its revision and a
    /// replaced store carries a different source id, so memoized results are
    /// recomputed on the next call.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Give the source back.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Resolve `collection.field` as a many-to-many field.
    pub fn resolve_m2m(&mut self, collection: &str, field: &str) -> Option<RelationM2M> {
        let revision = self.source.revision();
        let source = &self.source;
        let policy = self.config.ambiguity;
        let resolution = self.cache.get_or_insert_with(
            ResolutionKind::ManyToMany,
            collection,
            field,
            revision,
            || Resolution::ManyToMany(resolve_m2m_with(source, collection, field, policy)),
        );
        match resolution {
            Resolution::ManyToMany(resolved) => resolved,
            Resolution::ManyToAny(_) => None,
        }
    }

    /// Resolve `collection.field` as a many-to-any field.
    pub fn resolve_m2a(&mut self, collection: &str, field: &str) -> Option<RelationM2A> {
        let revision = self.source.revision();
        let source = &self.source;
        let policy = self.config.ambiguity;
        let resolution = self.cache.get_or_insert_with(
            ResolutionKind::ManyToAny,
            collection,
            field,
            revision,
            || Resolution::ManyToAny(resolve_m2a_with(source, collection, field, policy)),
        );
        match resolution {
            Resolution::ManyToAny(resolved) => resolved,
            Resolution::ManyToMany(_) => None,
        }
    }

    /// React to a change notification from the source. Returns the number of
    /// evicted entries.
    pub fn on_schema_change(&mut self, change: &SchemaChange) -> usize {
        self.cache.evict_affected(change)
    }

    /// Drop every memoized resolution.
    pub fn invalidate_all(&mut self) {
        tracing::debug!(entries = self.cache.len(), "Invalidating all resolutions");
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
