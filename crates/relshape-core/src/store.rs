//! In-memory schema store.
//!
//! `SchemaStore` holds collections, fields and relations as plain values and
//! implements every catalog trait over them. Each mutation bumps the revision
//! counter of the registry it touched and notifies subscribed listeners, so
//! memoized resolutions can be invalidated.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::catalog::{
    CollectionCatalog, FieldCatalog, RelationRegistry, SchemaRevision, SchemaSource,
};
use crate::snapshot::{SchemaSnapshot, require_name, validate_field, validate_relation};
use crate::{Collection, Field, Relation, Result};

/// Describes which registry changed and which collections were affected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaChange {
    Relations { collections: Vec<String> },
    Collections { collections: Vec<String> },
    Fields { collections: Vec<String> },
}

impl SchemaChange {
    /// Collections affected by the change.
    pub fn collections(&self) -> &[String] {
        match self {
            SchemaChange::Relations { collections }
            | SchemaChange::Collections { collections }
            | SchemaChange::Fields { collections } => collections,
        }
    }

    /// True if `collection` is among the affected collections.
    pub fn touches(&self, collection: &str) -> bool {
        self.collections().iter().any(|c| c == collection)
    }
}

/// Handle returned by [`SchemaStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&SchemaChange) + Send + Sync>;

/// Source ids handed out to stores. Zero is left for `SchemaRevision::default()`.
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// In-memory implementation of [`SchemaSource`].
pub struct SchemaStore {
    collections: Vec<Collection>,
    fields: Vec<Field>,
    relations: Vec<Relation>,
    revision: SchemaRevision,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self {
            collections: Vec::new(),
            fields: Vec::new(),
            relations: Vec::new(),
            revision: SchemaRevision {
                source: NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed),
                ..SchemaRevision::default()
            },
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaStore")
            .field("collections", &self.collections.len())
            .field("fields", &self.fields.len())
            .field("relations", &self.relations.len())
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Collections a relation record mentions: its own, its target and any
/// polymorphic targets.
fn relation_collections(relation: &Relation) -> Vec<String> {
    let mut names = vec![relation.collection.clone()];
    if let Some(related) = &relation.related_collection {
        names.push(related.clone());
    }
    if let Some(allowed) = relation.one_allowed_collections() {
        names.extend(allowed.iter().cloned());
    }
    names.sort();
    names.dedup();
    names
}

impl SchemaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, rejecting empty names and duplicate keys.
    pub fn from_snapshot(snapshot: SchemaSnapshot) -> Result<Self> {
        snapshot.validate()?;
        tracing::debug!(
            collections = snapshot.collections.len(),
            fields = snapshot.fields.len(),
            relations = snapshot.relations.len(),
            "Loading schema snapshot"
        );
        Ok(Self {
            collections: snapshot.collections,
            fields: snapshot.fields,
            relations: snapshot.relations,
            ..Self::default()
        })
    }

    /// Copy the current contents into a snapshot.
    pub fn snapshot(&self) -> SchemaSnapshot {
        SchemaSnapshot {
            collections: self.collections.clone(),
            fields: self.fields.clone(),
            relations: self.relations.clone(),
        }
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Register a change listener.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&SchemaChange) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn notify(&self, change: &SchemaChange) {
        tracing::trace!(change = ?change, listeners = self.listeners.len(), "Schema changed");
        for (_, listener) in &self.listeners {
            listener(change);
        }
    }

    fn relations_changed(&mut self, collections: Vec<String>) {
        self.revision.relations += 1;
        self.notify(&SchemaChange::Relations { collections });
    }

    fn collections_changed(&mut self, collections: Vec<String>) {
        self.revision.collections += 1;
        self.notify(&SchemaChange::Collections { collections });
    }

    fn fields_changed(&mut self, collections: Vec<String>) {
        self.revision.fields += 1;
        self.notify(&SchemaChange::Fields { collections });
    }

    /// Insert a collection or replace the one with the same name.
    pub fn upsert_collection(&mut self, collection: Collection) -> Result<()> {
        require_name("collection", &collection.collection)?;
        let name = collection.collection.clone();
        match self.collections.iter_mut().find(|c| c.collection == name) {
            Some(existing) => *existing = collection,
            None => self.collections.push(collection),
        }
        self.collections_changed(vec![name]);
        Ok(())
    }

    /// Remove a collection together with its fields and every relation touching it.
    pub fn remove_collection(&mut self, name: &str) -> Option<Collection> {
        let idx = self.collections.iter().position(|c| c.collection == name)?;
        let removed = self.collections.remove(idx);

        let fields_before = self.fields.len();
        self.fields.retain(|f| f.collection != name);
        if self.fields.len() != fields_before {
            self.fields_changed(vec![name.to_string()]);
        }

        let mut touched: Vec<String> = Vec::new();
        self.relations.retain(|r| {
            let hit = r.collection == name || r.related_collection.as_deref() == Some(name);
            if hit {
                touched.extend(relation_collections(r));
            }
            !hit
        });
        if !touched.is_empty() {
            touched.sort();
            touched.dedup();
            self.relations_changed(touched);
        }

        self.collections_changed(vec![name.to_string()]);
        Some(removed)
    }

    /// Insert a field or replace the one with the same `(collection, field)`.
    pub fn upsert_field(&mut self, field: Field) -> Result<()> {
        validate_field(&field)?;
        let collection = field.collection.clone();
        match self
            .fields
            .iter_mut()
            .find(|f| f.collection == field.collection && f.field == field.field)
        {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self.fields_changed(vec![collection]);
        Ok(())
    }

    pub fn remove_field(&mut self, collection: &str, field: &str) -> Option<Field> {
        let idx = self
            .fields
            .iter()
            .position(|f| f.collection == collection && f.field == field)?;
        let removed = self.fields.remove(idx);
        self.fields_changed(vec![collection.to_string()]);
        Some(removed)
    }

    /// Insert a relation or replace the one stored on the same `(collection, field)`.
    pub fn upsert_relation(&mut self, relation: Relation) -> Result<()> {
        validate_relation(&relation)?;
        let mut touched = relation_collections(&relation);
        match self
            .relations
            .iter_mut()
            .find(|r| r.is_on(&relation.collection, &relation.field))
        {
            Some(existing) => {
                touched.extend(relation_collections(existing));
                *existing = relation;
            }
            None => self.relations.push(relation),
        }
        touched.sort();
        touched.dedup();
        self.relations_changed(touched);
        Ok(())
    }

    pub fn remove_relation(&mut self, collection: &str, field: &str) -> Option<Relation> {
        let idx = self
            .relations
            .iter()
            .position(|r| r.is_on(collection, field))?;
        let removed = self.relations.remove(idx);
        self.relations_changed(relation_collections(&removed));
        Some(removed)
    }

    /// Replace the whole relation registry.
    pub fn replace_relations(&mut self, relations: Vec<Relation>) -> Result<()> {
        for relation in &relations {
            validate_relation(relation)?;
        }
        let mut touched: Vec<String> = self
            .relations
            .iter()
            .chain(relations.iter())
            .flat_map(relation_collections)
            .collect();
        touched.sort();
        touched.dedup();
        self.relations = relations;
        self.relations_changed(touched);
        Ok(())
    }
}

impl RelationRegistry for SchemaStore {
    fn relations_for_field(&self, collection: &str, field: &str) -> Vec<Relation> {
        let mut found: Vec<Relation> = self
            .relations
            .iter()
            .filter(|r| r.is_on(collection, field) || r.is_reverse_of(collection, field))
            .cloned()
            .collect();

        // The owning half of a junction pair is stored on the junction itself, so
        // neither predicate above reaches it. Pull it in through the first match.
        let sibling = found.first().and_then(|first| {
            let junction_field = first.junction_field()?;
            self.relations
                .iter()
                .find(|r| r.is_on(&first.collection, junction_field))
                .cloned()
        });
        if let Some(sibling) = sibling {
            if !found.contains(&sibling) {
                found.push(sibling);
            }
        }

        tracing::trace!(
            collection = %collection,
            field = %field,
            candidates = found.len(),
            "Collected relations for field"
        );
        found
    }
}

impl CollectionCatalog for SchemaStore {
    fn collection(&self, name: &str) -> Option<Collection> {
        self.collections
            .iter()
            .find(|c| c.collection == name)
            .cloned()
    }
}

impl FieldCatalog for SchemaStore {
    fn field(&self, collection: &str, field: &str) -> Option<Field> {
        self.fields
            .iter()
            .find(|f| f.collection == collection && f.field == field)
            .cloned()
    }

    fn primary_key_field(&self, collection: &str) -> Option<Field> {
        self.fields
            .iter()
            .find(|f| f.collection == collection && f.is_primary_key())
            .cloned()
    }

    fn fields_for_collection(&self, collection: &str) -> Vec<Field> {
        let mut fields: Vec<Field> = self
            .fields
            .iter()
            .filter(|f| f.collection == collection)
            .cloned()
            .collect();
        // Stable: unsorted fields keep insertion order after the sorted ones.
        fields.sort_by_key(|f| (f.sort_position().is_none(), f.sort_position()));
        fields
    }
}

impl SchemaSource for SchemaStore {
    fn revision(&self) -> SchemaRevision {
        self.revision
    }
}
