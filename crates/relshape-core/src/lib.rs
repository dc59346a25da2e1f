//! Core types for relshape.
//!
//! This crate provides the metadata that relational shape resolution reads:
//!
//! - `Relation` records (pairwise, directional edges) and their `EdgeRole`
//! - `Collection` and `Field` catalog entries
//! - The collaborator traits (`RelationRegistry`, `CollectionCatalog`, `FieldCatalog`)
//! - `SchemaStore`, an in-memory implementation with revisions and change notifications
//! - `SchemaSnapshot` for loading the registries from JSON

pub mod catalog;
pub mod collection;
pub mod error;
pub mod field;
pub mod relation;
pub mod snapshot;
pub mod store;

pub use catalog::{
    CollectionCatalog, FieldCatalog, RelationRegistry, SchemaCatalog, SchemaRevision,
    SchemaSource,
};
pub use collection::{Collection, CollectionMeta, CollectionSchema};
pub use error::{ConfigError, Error, Result, SchemaError, SchemaErrorKind};
pub use field::{Field, FieldMeta, FieldSchema};
pub use relation::{DeselectAction, EdgeRole, OnDelete, Relation, RelationMeta, RelationSchema};
pub use snapshot::SchemaSnapshot;
pub use store::{SchemaChange, SchemaStore, SubscriptionId};
