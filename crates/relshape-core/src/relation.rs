//! Pairwise relation records.
//!
//! A relation is a single directional edge: `collection.field` holds a foreign
//! key that points at `related_collection`. Many-to-many and many-to-any
//! relationships are stored as *two* such records on a shared junction
//! collection, linked through `meta.junction_field`. Nothing here pairs them
//! up; that happens in the resolver.

use serde::{Deserialize, Serialize};

/// What happens to a junction row when the item is deselected in an editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeselectAction {
    /// Null out the foreign key (default).
    #[default]
    Nullify,
    /// Delete the junction row.
    Delete,
}

/// Database `ON DELETE` behavior of the underlying foreign key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnDelete {
    #[default]
    #[serde(rename = "NO ACTION")]
    NoAction,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "RESTRICT")]
    Restrict,
}

/// Foreign key information for a relation, when it is backed by a real constraint.
///
/// Polymorphic edges have no foreign key table, so both `foreign_key_*` members
/// are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationSchema {
    pub table: String,
    pub column: String,
    pub foreign_key_table: Option<String>,
    pub foreign_key_column: Option<String>,
    pub on_delete: OnDelete,
}

/// Optional metadata attached to a relation record.
///
/// Valid combinations:
/// - plain many-to-one: everything unset, or only `one_field` for the reverse alias
/// - junction half (M2M either side, M2A junction edge): `junction_field` set,
///   usually with `one_field` and `sort_field`
/// - polymorphic edge (M2A owning edge): `one_allowed_collections` and
///   `one_collection_field` set, `junction_field` pointing back at the sibling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationMeta {
    /// Alias field on the related collection exposing the reverse (one-to-many) side.
    pub one_field: Option<String>,
    /// Field on the junction collection storing manual order.
    pub sort_field: Option<String>,
    /// Sibling field on the same junction collection forming the other half of the pair.
    pub junction_field: Option<String>,
    /// Discriminator field on the junction naming the referenced collection (M2A).
    pub one_collection_field: Option<String>,
    /// Collections a polymorphic edge may reference, in display order (M2A).
    pub one_allowed_collections: Option<Vec<String>>,
    pub one_deselect_action: DeselectAction,
}

impl RelationMeta {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reverse alias field on the related collection.
    #[must_use]
    pub fn one_field(mut self, field: impl Into<String>) -> Self {
        self.one_field = Some(field.into());
        self
    }

    /// Set the junction sort field.
    #[must_use]
    pub fn sort_field(mut self, field: impl Into<String>) -> Self {
        self.sort_field = Some(field.into());
        self
    }

    /// Set the sibling junction field.
    #[must_use]
    pub fn junction_field(mut self, field: impl Into<String>) -> Self {
        self.junction_field = Some(field.into());
        self
    }

    /// Set the discriminator field of a polymorphic edge.
    #[must_use]
    pub fn one_collection_field(mut self, field: impl Into<String>) -> Self {
        self.one_collection_field = Some(field.into());
        self
    }

    /// Set the allowed collections of a polymorphic edge.
    #[must_use]
    pub fn one_allowed_collections<I, S>(mut self, collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_allowed_collections = Some(collections.into_iter().map(Into::into).collect());
        self
    }

    /// Set the deselect action.
    #[must_use]
    pub fn one_deselect_action(mut self, action: DeselectAction) -> Self {
        self.one_deselect_action = action;
        self
    }
}

/// The role a relation record plays on its own, independent of any query.
///
/// Whether a `JunctionHalf` acts as the junction edge or the owning edge of a
/// resolved pair depends on which side is being queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole<'a> {
    /// Polymorphic "any" edge of an M2A junction.
    Polymorphic {
        allowed_collections: &'a [String],
        collection_field: Option<&'a str>,
    },
    /// One half of a junction pair.
    JunctionHalf { junction_field: &'a str },
    /// Ordinary foreign key.
    ManyToOne,
}

/// A single pairwise relation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Collection holding the foreign key.
    pub collection: String,
    /// Field holding the foreign key.
    pub field: String,
    /// Collection the foreign key points to; `None` for polymorphic edges.
    #[serde(default)]
    pub related_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<RelationSchema>,
    #[serde(default)]
    pub meta: Option<RelationMeta>,
}

impl Relation {
    /// Create a relation without a target or metadata.
    #[must_use]
    pub fn new(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            related_collection: None,
            schema: None,
            meta: None,
        }
    }

    /// Set the related collection.
    #[must_use]
    pub fn related_collection(mut self, collection: impl Into<String>) -> Self {
        self.related_collection = Some(collection.into());
        self
    }

    /// Attach metadata.
    #[must_use]
    pub fn meta(mut self, meta: RelationMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Attach foreign key information.
    #[must_use]
    pub fn schema(mut self, schema: RelationSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn one_field(&self) -> Option<&str> {
        self.meta.as_ref()?.one_field.as_deref()
    }

    pub fn junction_field(&self) -> Option<&str> {
        self.meta.as_ref()?.junction_field.as_deref()
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.meta.as_ref()?.sort_field.as_deref()
    }

    pub fn one_collection_field(&self) -> Option<&str> {
        self.meta.as_ref()?.one_collection_field.as_deref()
    }

    pub fn one_allowed_collections(&self) -> Option<&[String]> {
        self.meta.as_ref()?.one_allowed_collections.as_deref()
    }

    /// True if this record is stored on `collection.field`.
    pub fn is_on(&self, collection: &str, field: &str) -> bool {
        self.collection == collection && self.field == field
    }

    /// True if this record points at `collection` and exposes itself there as `field`.
    pub fn is_reverse_of(&self, collection: &str, field: &str) -> bool {
        self.related_collection.as_deref() == Some(collection) && self.one_field() == Some(field)
    }

    /// Classify the record by its metadata.
    pub fn role(&self) -> EdgeRole<'_> {
        if let Some(allowed) = self.one_allowed_collections() {
            return EdgeRole::Polymorphic {
                allowed_collections: allowed,
                collection_field: self.one_collection_field(),
            };
        }
        match self.junction_field() {
            Some(junction_field) => EdgeRole::JunctionHalf { junction_field },
            None => EdgeRole::ManyToOne,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain_sets_meta() {
        let rel = Relation::new("articles_tags", "article_id")
            .related_collection("articles")
            .meta(
                RelationMeta::new()
                    .one_field("tags")
                    .junction_field("tag_id")
                    .sort_field("sort"),
            );

        assert_eq!(rel.related_collection.as_deref(), Some("articles"));
        assert_eq!(rel.one_field(), Some("tags"));
        assert_eq!(rel.junction_field(), Some("tag_id"));
        assert_eq!(rel.sort_field(), Some("sort"));
        assert_eq!(rel.one_collection_field(), None);
        assert!(rel.is_on("articles_tags", "article_id"));
        assert!(rel.is_reverse_of("articles", "tags"));
        assert!(!rel.is_reverse_of("tags", "tags"));
    }

    #[test]
    fn test_accessors_without_meta_are_none() {
        let rel = Relation::new("posts", "author").related_collection("users");
        assert_eq!(rel.one_field(), None);
        assert_eq!(rel.junction_field(), None);
        assert_eq!(rel.one_allowed_collections(), None);
        assert_eq!(rel.role(), EdgeRole::ManyToOne);
    }

    #[test]
    fn test_role_classification() {
        let half = Relation::new("j", "a_id")
            .related_collection("a")
            .meta(RelationMeta::new().junction_field("b_id"));
        assert_eq!(half.role(), EdgeRole::JunctionHalf { junction_field: "b_id" });

        let poly = Relation::new("j", "item").meta(
            RelationMeta::new()
                .one_allowed_collections(["headings", "paragraphs"])
                .one_collection_field("collection")
                .junction_field("page_id"),
        );
        match poly.role() {
            EdgeRole::Polymorphic {
                allowed_collections,
                collection_field,
            } => {
                assert_eq!(allowed_collections, ["headings", "paragraphs"]);
                assert_eq!(collection_field, Some("collection"));
            }
            other => panic!("expected polymorphic role, got {other:?}"),
        }
    }

    #[test]
    fn test_deserializes_persisted_shape() {
        let json = r#"{
            "collection": "pages_blocks",
            "field": "item",
            "related_collection": null,
            "schema": null,
            "meta": {
                "one_field": null,
                "junction_field": "pages_id",
                "one_collection_field": "collection",
                "one_allowed_collections": ["headings", "text"],
                "sort_field": null,
                "one_deselect_action": "delete"
            }
        }"#;
        let rel: Relation = serde_json::from_str(json).unwrap();
        assert_eq!(rel.related_collection, None);
        assert_eq!(rel.schema, None);
        assert_eq!(
            rel.meta.as_ref().unwrap().one_deselect_action,
            DeselectAction::Delete
        );
        assert!(matches!(rel.role(), EdgeRole::Polymorphic { .. }));
    }

    #[test]
    fn test_relation_schema_on_delete_names() {
        let schema: RelationSchema = serde_json::from_str(
            r#"{"table":"articles_tags","column":"tag_id","foreign_key_table":"tags","foreign_key_column":"id","on_delete":"SET NULL"}"#,
        )
        .unwrap();
        assert_eq!(schema.on_delete, OnDelete::SetNull);
        assert_eq!(schema.foreign_key_table.as_deref(), Some("tags"));
    }
}
