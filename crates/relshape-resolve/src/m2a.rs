//! Many-to-any resolution.
//!
//! The owning edge of an M2A pair has no `related_collection`. Instead it
//! lists the collections a junction row may reference and names a
//! discriminator field, stored on the junction, that records which one a
//! given row points at.

use relshape_core::{Collection, Field, Relation, SchemaCatalog};
use serde::{Deserialize, Serialize};

use crate::config::AmbiguityPolicy;
use crate::matcher::{junction_parts, match_relation_pair};

/// A resolved many-to-any relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationM2A {
    /// Collections a junction row may reference, in declared order.
    pub allowed_collections: Vec<String>,
    /// Discriminator field on the junction collection.
    pub collection_field: Option<Field>,
    pub junction_collection: Option<Collection>,
    pub junction_primary_key_field: Option<Field>,
    pub junction_fields: Vec<Field>,
    /// Junction edge: junction -> queried collection.
    pub junction: Relation,
    /// Owning (polymorphic) edge.
    pub relation: Relation,
    /// Junction field holding manual sort order. Read from the owning edge's
    /// `meta.sort_field`, falling back to the junction edge's when the owning
    /// edge has none. Never inferred from field names.
    pub sort_field: Option<String>,
}

impl RelationM2A {
    pub fn junction_collection_name(&self) -> &str {
        &self.junction.collection
    }

    /// Discriminator field name as stored on the owning edge.
    pub fn collection_field_name(&self) -> Option<&str> {
        self.relation.one_collection_field()
    }

    /// True if junction rows may reference `collection`.
    pub fn allows(&self, collection: &str) -> bool {
        self.allowed_collections.iter().any(|c| c == collection)
    }

    /// Junction field pointing at the queried collection.
    pub fn junction_field(&self) -> &str {
        &self.junction.field
    }

    /// Junction field holding the polymorphic item key.
    pub fn item_field(&self) -> &str {
        &self.relation.field
    }
}

/// Resolve `collection.field` as a many-to-any field.
pub fn resolve_m2a<S: SchemaCatalog + ?Sized>(
    source: &S,
    collection: &str,
    field: &str,
) -> Option<RelationM2A> {
    resolve_m2a_with(source, collection, field, AmbiguityPolicy::default())
}

/// Resolve `collection.field` as a many-to-any field with an explicit ambiguity policy.
#[tracing::instrument(level = "debug", skip(source))]
pub fn resolve_m2a_with<S: SchemaCatalog + ?Sized>(
    source: &S,
    collection: &str,
    field: &str,
    policy: AmbiguityPolicy,
) -> Option<RelationM2A> {
    let relations = source.relations_for_field(collection, field);
    let Some(pair) = match_relation_pair(&relations, collection, field, policy) else {
        tracing::debug!("Not a many-to-any field");
        return None;
    };

    let junction_name = pair.junction_collection();
    // The discriminator lives on the junction, not on any of the allowed collections.
    let collection_field = pair
        .relation
        .one_collection_field()
        .and_then(|name| {
            let found = source.field(junction_name, name);
            if found.is_none() {
                tracing::warn!(
                    collection = %junction_name,
                    field = %name,
                    "Discriminator field missing from catalog"
                );
            }
            found
        });

    let junction = junction_parts(source, junction_name);
    let resolved = RelationM2A {
        allowed_collections: pair
            .relation
            .one_allowed_collections()
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
        collection_field,
        junction_collection: junction.collection,
        junction_primary_key_field: junction.primary_key_field,
        junction_fields: junction.fields,
        junction: pair.junction.clone(),
        relation: pair.relation.clone(),
        sort_field: pair.sort_field(),
    };

    tracing::debug!(
        junction = %resolved.junction_collection_name(),
        allowed = resolved.allowed_collections.len(),
        "Resolved many-to-any"
    );
    Some(resolved)
}
