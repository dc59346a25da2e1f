//! Serialized schema snapshots.
//!
//! A snapshot is the persisted JSON shape of the three registries:
//!
//! ```json
//! { "collections": [...], "fields": [...], "relations": [...] }
//! ```
//!
//! Keys use snake_case (`related_collection`, `one_field`, ...). Missing
//! top-level arrays default to empty.

use std::collections::HashSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{Collection, Error, Field, Relation, Result};

pub(crate) fn require_name(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_schema(format!("{kind} has an empty name")));
    }
    Ok(())
}

pub(crate) fn validate_field(field: &Field) -> Result<()> {
    require_name("field collection", &field.collection)?;
    require_name("field", &field.field)
}

pub(crate) fn validate_relation(relation: &Relation) -> Result<()> {
    require_name("relation collection", &relation.collection)?;
    require_name("relation field", &relation.field)?;
    if let Some(related) = &relation.related_collection {
        require_name("relation related_collection", related)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSnapshot {
    pub collections: Vec<Collection>,
    pub fields: Vec<Field>,
    pub relations: Vec<Relation>,
}

impl SchemaSnapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        Ok(snapshot)
    }

    /// Parse a snapshot from a reader (file, socket buffer, ...).
    pub fn from_reader(mut reader: impl Read) -> Result<Self> {
        let mut buf = String::new();
        reader.read_to_string(&mut buf)?;
        Self::from_json(&buf)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check names are present and keys are unique. Records are held to the
    /// same name rules as store upserts.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for c in &self.collections {
            require_name("collection", &c.collection)?;
            if !seen.insert(c.collection.as_str()) {
                return Err(Error::duplicate(format!(
                    "collection '{}' declared more than once",
                    c.collection
                )));
            }
        }

        let mut seen = HashSet::new();
        for f in &self.fields {
            validate_field(f)?;
            if !seen.insert((f.collection.as_str(), f.field.as_str())) {
                return Err(Error::duplicate(format!(
                    "field '{}.{}' declared more than once",
                    f.collection, f.field
                )));
            }
        }

        let mut seen = HashSet::new();
        for r in &self.relations {
            validate_relation(r)?;
            if !seen.insert((r.collection.as_str(), r.field.as_str())) {
                return Err(Error::duplicate(format!(
                    "relation on '{}.{}' declared more than once",
                    r.collection, r.field
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SchemaErrorKind;

    const ARTICLES: &str = r#"{
        "collections": [
            {"collection": "articles"},
            {"collection": "tags", "meta": {"icon": "label"}}
        ],
        "fields": [
            {"collection": "tags", "field": "id", "type": "integer",
             "schema": {"is_primary_key": true, "is_nullable": false}}
        ],
        "relations": [
            {"collection": "articles_tags", "field": "tag_id", "related_collection": "tags",
             "meta": {"junction_field": "article_id"}}
        ]
    }"#;

    #[test]
    fn test_parses_and_validates() {
        let snapshot = SchemaSnapshot::from_json(ARTICLES).unwrap();
        assert_eq!(snapshot.collections.len(), 2);
        assert!(snapshot.fields[0].is_primary_key());
        assert_eq!(snapshot.relations[0].junction_field(), Some("article_id"));
        snapshot.validate().unwrap();
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot = SchemaSnapshot::from_json("{}").unwrap();
        assert_eq!(snapshot, SchemaSnapshot::default());
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = SchemaSnapshot::from_json(ARTICLES).unwrap();
        let again = SchemaSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(again, snapshot);
    }

    #[test]
    fn test_from_reader_reads_bytes() {
        let snapshot = SchemaSnapshot::from_reader(ARTICLES.as_bytes()).unwrap();
        assert_eq!(snapshot.relations.len(), 1);
    }

    #[test]
    fn test_malformed_json_is_serde_error() {
        let err = SchemaSnapshot::from_json(r#"{"relations": [{"collection": 1}]}"#).unwrap_err();
        assert!(matches!(err, Error::Serde(_)));
    }

    #[test]
    fn test_duplicate_relation_key_is_rejected() {
        let mut snapshot = SchemaSnapshot::from_json(ARTICLES).unwrap();
        snapshot.relations.push(snapshot.relations[0].clone());
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.schema_kind(), Some(SchemaErrorKind::Duplicate));
    }

    #[test]
    fn test_empty_related_collection_is_rejected() {
        let json = r#"{"relations": [
            {"collection": "articles_tags", "field": "tag_id", "related_collection": ""}
        ]}"#;
        let snapshot = SchemaSnapshot::from_json(json).unwrap();
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.schema_kind(), Some(SchemaErrorKind::Invalid));

        let err = crate::SchemaStore::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.schema_kind(), Some(SchemaErrorKind::Invalid));
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "snapshot stream dropped",
            ))
        }
    }

    #[test]
    fn test_from_reader_failure_is_io_error() {
        let err = SchemaSnapshot::from_reader(FailingReader).unwrap_err();
        match err {
            Error::Io(io) => assert_eq!(io.kind(), std::io::ErrorKind::ConnectionReset),
            other => panic!("expected I/O error, got {other:?}"),
        }

        let err = SchemaSnapshot::from_reader(&[0xff, 0xfe, b'{', b'}'][..]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_empty_field_name_is_rejected() {
        let mut snapshot = SchemaSnapshot::default();
        snapshot.fields.push(Field::new("tags", "", "string"));
        let err = snapshot.validate().unwrap_err();
        assert_eq!(err.schema_kind(), Some(SchemaErrorKind::Invalid));
    }
}
