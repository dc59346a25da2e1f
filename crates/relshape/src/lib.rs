//! relshape - resolve relational shape metadata from a pairwise relation registry.
//!
//! Many-to-many (M2M) and many-to-many-to-any (M2A) relationships are stored
//! as two independent relation records on a junction collection. relshape
//! reassembles them into one descriptor per `(collection, field)`:
//!
//! - which collection is the junction, and its primary key and fields
//! - which collection is related (M2M), or which collections are allowed and
//!   which junction field discriminates between them (M2A)
//! - which junction field stores manual sort order
//!
//! # Quick Start
//!
//! ```
//! use relshape::prelude::*;
//!
//! let snapshot = SchemaSnapshot::from_json(r#"{
//!     "collections": [
//!         {"collection": "articles"},
//!         {"collection": "articles_tags"},
//!         {"collection": "tags"}
//!     ],
//!     "relations": [
//!         {"collection": "articles_tags", "field": "tag_id", "related_collection": "tags"},
//!         {"collection": "articles_tags", "field": "article_id", "related_collection": "articles",
//!          "meta": {"one_field": "tags", "junction_field": "tag_id", "sort_field": "sort"}}
//!     ]
//! }"#).unwrap();
//! let store = SchemaStore::from_snapshot(snapshot).unwrap();
//!
//! let mut resolver = RelationResolver::new(&store);
//! let m2m = resolver.resolve_m2m("articles", "tags").unwrap();
//! assert_eq!(m2m.junction_collection_name(), "articles_tags");
//! assert_eq!(m2m.sort_field.as_deref(), Some("sort"));
//! assert!(resolver.resolve_m2a("articles", "title").is_none());
//! ```

pub use relshape_core::{
    Collection, CollectionCatalog, CollectionMeta, CollectionSchema, ConfigError,
    DeselectAction, EdgeRole, Error, Field, FieldCatalog, FieldMeta, FieldSchema, OnDelete,
    Relation, RelationMeta, RelationRegistry, RelationSchema, Result, SchemaCatalog,
    SchemaChange, SchemaError, SchemaErrorKind, SchemaRevision, SchemaSnapshot, SchemaSource,
    SchemaStore, SubscriptionId,
};
pub use relshape_resolve::{
    AmbiguityPolicy, CacheStats, RelationM2A, RelationM2M, RelationPair, RelationResolver,
    Resolution, ResolutionCache, ResolutionKind, ResolverConfig, match_relation_pair,
    resolve_m2a, resolve_m2a_with, resolve_m2m, resolve_m2m_with,
};

/// Load a schema snapshot from JSON into a ready-to-use store.
pub fn load_store(json: &str) -> Result<SchemaStore> {
    SchemaStore::from_snapshot(SchemaSnapshot::from_json(json)?)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        AmbiguityPolicy, Collection, CollectionCatalog, EdgeRole, Error, Field, FieldCatalog,
        Relation, RelationM2A, RelationM2M, RelationMeta, RelationRegistry, RelationResolver,
        ResolverConfig, Result, SchemaChange, SchemaSnapshot, SchemaSource, SchemaStore,
        load_store, resolve_m2a, resolve_m2m,
    };
}
