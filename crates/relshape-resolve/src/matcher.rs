//! Two-hop relation matching shared by the M2M and M2A resolvers.
//!
//! A many-to-many (or many-to-any) relationship is stored as two relation
//! records on a junction collection:
//!
//! ```text
//!   articles.tags  <--(junction edge)--  articles_tags.article_id
//!                                        articles_tags.tag_id  --(owning edge)-->  tags
//! ```
//!
//! The junction edge points back at the queried collection and names the
//! queried field as its reverse alias; its `junction_field` names the sibling
//! record, which is the owning edge.

use relshape_core::{Collection, Field, Relation, SchemaCatalog};

use crate::config::AmbiguityPolicy;

/// The two records forming one M2M/M2A relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationPair<'a> {
    /// Record on the junction pointing back at the queried collection.
    pub junction: &'a Relation,
    /// Record on the junction pointing toward the far side.
    pub relation: &'a Relation,
}

impl RelationPair<'_> {
    /// Name of the junction collection.
    pub fn junction_collection(&self) -> &str {
        &self.junction.collection
    }

    /// Sort field of the pair: owning edge first, then junction edge.
    pub fn sort_field(&self) -> Option<String> {
        self.relation
            .sort_field()
            .or_else(|| self.junction.sort_field())
            .map(str::to_string)
    }
}

/// Find the junction edge and owning edge among `relations` for `collection.field`.
///
/// Returns `None` when either hop finds nothing, or when the junction hop is
/// ambiguous and `policy` is [`AmbiguityPolicy::Reject`].
pub fn match_relation_pair<'a>(
    relations: &'a [Relation],
    collection: &str,
    field: &str,
    policy: AmbiguityPolicy,
) -> Option<RelationPair<'a>> {
    let mut candidates = relations
        .iter()
        .filter(|r| r.is_reverse_of(collection, field) && r.junction_field().is_some());

    let junction = candidates.next()?;
    let extra = candidates.count();
    if extra > 0 {
        match policy {
            AmbiguityPolicy::FirstMatch => {
                tracing::warn!(
                    collection = %collection,
                    field = %field,
                    candidates = extra + 1,
                    chosen = %junction.collection,
                    "Multiple junction relations match; using the first"
                );
            }
            AmbiguityPolicy::Reject => {
                tracing::warn!(
                    collection = %collection,
                    field = %field,
                    candidates = extra + 1,
                    "Multiple junction relations match; rejecting"
                );
                return None;
            }
        }
    }

    let junction_field = junction.junction_field()?;
    let Some(relation) = relations
        .iter()
        .find(|r| r.is_on(&junction.collection, junction_field))
    else {
        tracing::debug!(
            junction = %junction.collection,
            junction_field = %junction_field,
            "Junction relation has no owning sibling"
        );
        return None;
    };

    Some(RelationPair { junction, relation })
}

/// Catalog entries describing a junction collection.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct JunctionParts {
    pub collection: Option<Collection>,
    pub primary_key_field: Option<Field>,
    pub fields: Vec<Field>,
}

/// Look up the junction collection, its primary key and its fields.
///
/// Missing entries stay `None`/empty; assembly carries on.
pub(crate) fn junction_parts<S: SchemaCatalog + ?Sized>(source: &S, junction: &str) -> JunctionParts {
    let collection = source.collection(junction);
    if collection.is_none() {
        tracing::warn!(collection = %junction, "Junction collection missing from catalog");
    }
    let primary_key_field = source.primary_key_field(junction);
    if primary_key_field.is_none() {
        tracing::warn!(collection = %junction, "Junction collection has no primary key field");
    }
    JunctionParts {
        collection,
        primary_key_field,
        fields: source.fields_for_collection(junction),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relshape_core::RelationMeta;

    fn owning() -> Relation {
        Relation::new("articles_tags", "tag_id")
            .related_collection("tags")
            .meta(RelationMeta::new().junction_field("article_id"))
    }

    fn junction() -> Relation {
        Relation::new("articles_tags", "article_id")
            .related_collection("articles")
            .meta(
                RelationMeta::new()
                    .one_field("tags")
                    .junction_field("tag_id")
                    .sort_field("sort"),
            )
    }

    #[test]
    fn test_matches_pair_regardless_of_order() {
        let relations = vec![owning(), junction()];
        let pair =
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::FirstMatch)
                .unwrap();
        assert_eq!(pair.junction.field, "article_id");
        assert_eq!(pair.relation.field, "tag_id");
        assert_eq!(pair.junction_collection(), "articles_tags");
        assert_eq!(pair.sort_field().as_deref(), Some("sort"));
    }

    #[test]
    fn test_empty_candidates_match_nothing() {
        assert!(match_relation_pair(&[], "articles", "tags", AmbiguityPolicy::FirstMatch).is_none());
    }

    #[test]
    fn test_junction_requires_junction_field() {
        // A plain one-to-many reverse alias is not a junction edge.
        let o2m = Relation::new("comments", "article")
            .related_collection("articles")
            .meta(RelationMeta::new().one_field("comments"));
        let relations = vec![o2m];
        assert!(
            match_relation_pair(&relations, "articles", "comments", AmbiguityPolicy::FirstMatch)
                .is_none()
        );
    }

    #[test]
    fn test_missing_owning_edge_matches_nothing() {
        let relations = vec![junction()];
        assert!(
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::FirstMatch)
                .is_none()
        );
    }

    #[test]
    fn test_owning_edge_must_share_junction_collection() {
        let stray = Relation::new("other_junction", "tag_id").related_collection("tags");
        let relations = vec![junction(), stray];
        assert!(
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::FirstMatch)
                .is_none()
        );
    }

    #[test]
    fn test_ambiguity_policy() {
        let second_junction = Relation::new("articles_tags_v2", "article_id")
            .related_collection("articles")
            .meta(RelationMeta::new().one_field("tags").junction_field("tag_id"));
        let second_owning = Relation::new("articles_tags_v2", "tag_id").related_collection("tags");
        let relations = vec![junction(), second_junction, owning(), second_owning];

        let pair =
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::FirstMatch)
                .unwrap();
        assert_eq!(pair.junction_collection(), "articles_tags");
        assert_eq!(pair.relation.collection, "articles_tags");

        assert!(
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::Reject).is_none()
        );
    }

    #[test]
    fn test_sort_field_prefers_owning_edge() {
        let owning = owning().meta(
            RelationMeta::new()
                .junction_field("article_id")
                .sort_field("position"),
        );
        let relations = vec![junction(), owning];
        let pair =
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::FirstMatch)
                .unwrap();
        assert_eq!(pair.sort_field().as_deref(), Some("position"));
    }

    #[test]
    fn test_sort_field_absent_on_both_halves() {
        let junction = Relation::new("articles_tags", "article_id")
            .related_collection("articles")
            .meta(RelationMeta::new().one_field("tags").junction_field("tag_id"));
        let relations = vec![junction, owning()];
        let pair =
            match_relation_pair(&relations, "articles", "tags", AmbiguityPolicy::FirstMatch)
                .unwrap();
        assert_eq!(pair.sort_field(), None);
    }
}
