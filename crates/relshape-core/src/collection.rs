//! Collection catalog entries.

use serde::{Deserialize, Serialize};

/// Presentation metadata for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionMeta {
    pub hidden: bool,
    pub singleton: bool,
    pub icon: Option<String>,
    pub note: Option<String>,
    /// Field used for manual ordering of the collection's own items.
    pub sort_field: Option<String>,
    /// Parent folder, if the collection is grouped.
    pub group: Option<String>,
}

/// Storage information for a collection backed by a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSchema {
    pub name: String,
    pub comment: Option<String>,
}

/// A collection known to the catalog.
///
/// A collection without `schema` is a virtual folder and has no fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub collection: String,
    #[serde(default)]
    pub meta: Option<CollectionMeta>,
    #[serde(default)]
    pub schema: Option<CollectionSchema>,
}

impl Collection {
    /// Create a table-backed collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            schema: Some(CollectionSchema {
                name: name.clone(),
                comment: None,
            }),
            collection: name,
            meta: None,
        }
    }

    /// Create a folder collection with no backing table.
    #[must_use]
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            meta: None,
            schema: None,
        }
    }

    /// Attach presentation metadata.
    #[must_use]
    pub fn meta(mut self, meta: CollectionMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn name(&self) -> &str {
        &self.collection
    }

    pub fn is_folder(&self) -> bool {
        self.schema.is_none()
    }

    pub fn is_hidden(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.hidden)
    }

    pub fn is_singleton(&self) -> bool {
        self.meta.as_ref().is_some_and(|m| m.singleton)
    }
}
