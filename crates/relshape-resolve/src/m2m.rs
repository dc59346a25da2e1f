//! Many-to-many resolution.

use relshape_core::{Collection, Field, Relation, SchemaCatalog};
use serde::{Deserialize, Serialize};

use crate::config::AmbiguityPolicy;
use crate::matcher::{junction_parts, match_relation_pair};

/// A resolved many-to-many relationship.
///
/// Catalog-derived members are `None` when the catalog does not (currently)
/// know the referenced collection or field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationM2M {
    /// Owning edge: junction -> related collection.
    pub relation: Relation,
    pub related_collection: Option<Collection>,
    pub related_primary_key_field: Option<Field>,
    pub junction_collection: Option<Collection>,
    pub junction_primary_key_field: Option<Field>,
    pub junction_fields: Vec<Field>,
    /// Junction edge: junction -> queried collection.
    pub junction: Relation,
    /// Junction field holding manual sort order. Read from the owning edge's
    /// `meta.sort_field`, falling back to the junction edge's when the owning
    /// edge has none. Never inferred from field names.
    pub sort_field: Option<String>,
}

impl RelationM2M {
    /// Name of the junction collection, known even if the catalog lacks it.
    pub fn junction_collection_name(&self) -> &str {
        &self.junction.collection
    }

    /// Name of the related collection as stored on the owning edge.
    pub fn related_collection_name(&self) -> Option<&str> {
        self.relation.related_collection.as_deref()
    }

    /// Junction field pointing at the queried collection.
    pub fn junction_field(&self) -> &str {
        &self.junction.field
    }

    /// Junction field pointing at the related collection.
    pub fn related_field(&self) -> &str {
        &self.relation.field
    }
}

/// Resolve `collection.field` as a many-to-many field.
pub fn resolve_m2m<S: SchemaCatalog + ?Sized>(
    source: &S,
    collection: &str,
    field: &str,
) -> Option<RelationM2M> {
    resolve_m2m_with(source, collection, field, AmbiguityPolicy::default())
}

/// Resolve `collection.field` as a many-to-many field with an explicit ambiguity policy.
#[tracing::instrument(level = "debug", skip(source))]
pub fn resolve_m2m_with<S: SchemaCatalog + ?Sized>(
    source: &S,
    collection: &str,
    field: &str,
    policy: AmbiguityPolicy,
) -> Option<RelationM2M> {
    let relations = source.relations_for_field(collection, field);
    let Some(pair) = match_relation_pair(&relations, collection, field, policy) else {
        tracing::debug!("Not a many-to-many field");
        return None;
    };

    let related = pair.relation.related_collection.as_deref();
    let (related_collection, related_primary_key_field) = match related {
        Some(name) => {
            let c = source.collection(name);
            if c.is_none() {
                tracing::warn!(collection = %name, "Related collection missing from catalog");
            }
            (c, source.primary_key_field(name))
        }
        None => (None, None),
    };

    let junction = junction_parts(source, pair.junction_collection());
    let resolved = RelationM2M {
        relation: pair.relation.clone(),
        related_collection,
        related_primary_key_field,
        junction_collection: junction.collection,
        junction_primary_key_field: junction.primary_key_field,
        junction_fields: junction.fields,
        junction: pair.junction.clone(),
        sort_field: pair.sort_field(),
    };

    tracing::debug!(
        junction = %resolved.junction_collection_name(),
        related = ?resolved.related_collection_name(),
        "Resolved many-to-many"
    );
    Some(resolved)
}
