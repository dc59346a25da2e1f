//! Field catalog entries.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Column information for a field backed by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    pub is_primary_key: bool,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    pub data_type: Option<String>,
    pub default_value: Option<serde_json::Value>,
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            is_primary_key: false,
            is_nullable: true,
            data_type: None,
            default_value: None,
        }
    }
}

/// Presentation metadata for a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMeta {
    /// Position in the collection's field list; unsorted fields come last.
    pub sort: Option<i32>,
    pub hidden: bool,
    pub interface: Option<String>,
    /// Special flags such as `m2m`, `m2a`, `o2m` or `uuid`.
    pub special: Option<Vec<String>>,
}

/// A field known to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub collection: String,
    pub field: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub schema: Option<FieldSchema>,
    #[serde(default)]
    pub meta: Option<FieldMeta>,
}

impl Field {
    /// Create a storage-backed field.
    #[must_use]
    pub fn new(
        collection: impl Into<String>,
        field: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            field_type: field_type.into(),
            schema: Some(FieldSchema::default()),
            meta: None,
        }
    }

    /// Create a non-nullable primary key field.
    #[must_use]
    pub fn primary_key(
        collection: impl Into<String>,
        field: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        let mut f = Self::new(collection, field, field_type);
        f.schema = Some(FieldSchema {
            is_primary_key: true,
            is_nullable: false,
            ..FieldSchema::default()
        });
        f
    }

    /// Create a virtual alias field (the reverse side of a relation).
    #[must_use]
    pub fn alias(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            field_type: "alias".to_string(),
            schema: None,
            meta: None,
        }
    }

    /// Set the sort position.
    #[must_use]
    pub fn sort(mut self, position: i32) -> Self {
        self.meta.get_or_insert_with(FieldMeta::default).sort = Some(position);
        self
    }

    /// Attach presentation metadata.
    #[must_use]
    pub fn meta(mut self, meta: FieldMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn is_primary_key(&self) -> bool {
        self.schema.as_ref().is_some_and(|s| s.is_primary_key)
    }

    pub fn is_alias(&self) -> bool {
        self.schema.is_none()
    }

    pub fn sort_position(&self) -> Option<i32> {
        self.meta.as_ref()?.sort
    }
}
