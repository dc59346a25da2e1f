//! Read-only collaborator contracts consumed by the resolvers.
//!
//! Lookups are best-effort: a missing collection or field is `None`, never an
//! error, because the surrounding system tolerates transient schema
//! inconsistency (for example mid-migration).

use crate::{Collection, Field, Relation};

/// Answers "which relations touch collection X, field Y".
pub trait RelationRegistry {
    /// All relations stored on `collection.field` or pointing at `collection`
    /// with `field` as their reverse alias. Empty if none.
    fn relations_for_field(&self, collection: &str, field: &str) -> Vec<Relation>;
}

/// Collection lookup.
pub trait CollectionCatalog {
    fn collection(&self, name: &str) -> Option<Collection>;
}

/// Field lookup.
pub trait FieldCatalog {
    fn field(&self, collection: &str, field: &str) -> Option<Field>;

    fn primary_key_field(&self, collection: &str) -> Option<Field>;

    /// All fields of `collection`, in display order.
    fn fields_for_collection(&self, collection: &str) -> Vec<Field>;
}

/// Everything a resolver reads.
pub trait SchemaCatalog: RelationRegistry + CollectionCatalog + FieldCatalog {}

impl<T: RelationRegistry + CollectionCatalog + FieldCatalog + ?Sized> SchemaCatalog for T {}

/// Per-registry change counters.
///
/// Each counter only ever increases. `source` identifies the catalog instance
/// the counters belong to, so two equal revisions mean the same catalog with
/// nothing a resolver reads changed in between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SchemaRevision {
    pub source: u64,
    pub relations: u64,
    pub collections: u64,
    pub fields: u64,
}

/// A catalog that can report its revision, so derived values can be memoized.
pub trait SchemaSource: SchemaCatalog {
    fn revision(&self) -> SchemaRevision;
}

impl<T: RelationRegistry + ?Sized> RelationRegistry for &T {
    fn relations_for_field(&self, collection: &str, field: &str) -> Vec<Relation> {
        (**self).relations_for_field(collection, field)
    }
}

impl<T: CollectionCatalog + ?Sized> CollectionCatalog for &T {
    fn collection(&self, name: &str) -> Option<Collection> {
        (**self).collection(name)
    }
}

impl<T: FieldCatalog + ?Sized> FieldCatalog for &T {
    fn field(&self, collection: &str, field: &str) -> Option<Field> {
        (**self).field(collection, field)
    }

    fn primary_key_field(&self, collection: &str) -> Option<Field> {
        (**self).primary_key_field(collection)
    }

    fn fields_for_collection(&self, collection: &str) -> Vec<Field> {
        (**self).fields_for_collection(collection)
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for &T {
    fn revision(&self) -> SchemaRevision {
        (**self).revision()
    }
}
